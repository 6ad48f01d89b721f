use smolisa::assembler;

#[test]
fn test_labels_resolve_to_selected_bytes() {
    let source = include_str!("labels.smol");
    let image = assembler::assemble(source).expect("could not assemble labels.smol");

    // Label `start` resolves to 0, so both selected bytes are zero.
    assert_eq!(
        image,
        vec![
            0x00, 0x00, // li $g0, 0
            0x01, 0x00, // liu $g0, ~high start
            0x10, 0x00, // li $g1, ~low start
        ],
    );
}

#[test]
fn test_forward_references_patch_the_immediate_byte() {
    let image = assembler::assemble(
        "li $g0, ~low target\nliu $g0, ~high target\n#offset 0x0204\ntarget:\n",
    )
    .expect("could not assemble the forward reference program");

    assert_eq!(image.len(), 0x0204);
    assert_eq!(image[1], 0x04);
    assert_eq!(image[3], 0x02);
}
