//! Demonstrate error handling for invalid Kode programs.

fn main() {
    // Unterminated string
    match kode::parse("SHOW \"unclosed.", "demo.kode") {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(e) => {
            println!("Parse error: {e}");
            println!("  Kind: {:?}", e.kind);
            if let Some(span) = e.spans.first() {
                println!("  Location: {span}");
            }
        }
    }

    println!();

    // Runtime errors keep the output produced before them.
    let source = "SET total TO 1.\nSHOW total.\nSHOW total + \"one\".\n";
    let execution = kode::run(source, "demo.kode", kode::Options::new().silent(true));
    print!("Output before failure:\n{}", execution.output);
    match execution.result {
        Ok(value) => println!("Result: {value} (unexpected)"),
        Err(kode::Error::Parse(e)) => print!("{}", e.report()),
        Err(kode::Error::Interpreter(e)) => {
            println!("Kind: {:?}", e.kind);
            print!("{}", e.report());
        }
    }
}
