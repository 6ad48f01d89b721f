use smolisa::{assembler, emulator::Emulator, instruction::Register, mmu::Mmu};

fn assemble_program() -> Vec<u8> {
    let source = include_str!("answer.smol");

    assembler::assemble(source).expect("could not assemble answer.smol")
}

#[test]
fn test_answer_assembles_byte_exact() {
    // Opcode Li = 0, destination $g0, immediate 0x2A.
    assert_eq!(assemble_program(), vec![0x00, 0x2A]);
}

#[test]
fn test_answer_executes_in_one_step() {
    let image = assemble_program();

    let mut mmu = Mmu::new();
    mmu.load(0, 0, &image);

    let mut emulator = Emulator::new(mmu);
    emulator.step().unwrap();

    assert_eq!(emulator.registers[Register::G0], 0x002A);
    assert_eq!(emulator.registers[Register::Ip], 0x0002);
    assert_eq!(emulator.cycles, 2);
    assert_eq!(emulator.executed_ops, 1);
}
