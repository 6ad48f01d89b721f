use smolisa::{assembler, emulator::Emulator, instruction::Register, mmu::Mmu};

#[test]
fn test_counter_loops_until_the_counter_drains() {
    let source = include_str!("counter.smol");
    let image = assembler::assemble(source).expect("could not assemble counter.smol");
    let end = image.len() as u16;

    let mut mmu = Mmu::new();
    mmu.load(0, 0, &image);

    let mut emulator = Emulator::new(mmu);

    let mut steps = 0;
    while emulator.registers[Register::Ip] < end {
        emulator.step().unwrap();

        steps += 1;
        assert!(steps < 100, "the program never fell out of the loop");

        // The bank register never changes, and the MMU must agree.
        assert_eq!(
            u16::from(emulator.mmu.current_bank()),
            emulator.registers[Register::Bank],
        );
    }

    assert_eq!(emulator.registers[Register::G2], 15);
    assert_eq!(emulator.registers[Register::G0], 0);

    // Five 2-cycle loads, then five iterations of three 3-cycle operations.
    assert_eq!(emulator.executed_ops, 20);
    assert_eq!(emulator.cycles, 55);
}
