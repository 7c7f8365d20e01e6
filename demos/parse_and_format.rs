//! Parse a Kode program and re-format it.

fn main() {
    let input = "set i to 0. while i less than 3 do set i to i plus 1. show i. end";

    let tree = kode::parse(input, "demo.kode").expect("parse failed");

    println!("Statements: {}", tree.statements.len());
    for statement in &tree.statements {
        println!("  {:?} at {}", statement.span(), statement.span());
    }

    let output = kode::format(&tree);
    println!("\nFormatted output:\n{output}");
}
