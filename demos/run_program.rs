//! Run a program with pre-recorded input lines.

use kode::{Options, RecordedLines};

fn main() {
    let source = "\
SET a TO INPUT.
SET b TO INPUT.
SHOW a * b.
IF a > b THEN
\tSHOW \"first is larger\".
ELSE
\tSHOW \"second is larger\".
END.
";

    let options = Options::new()
        .silent(true)
        .input(RecordedLines::new(["6", "7"]));
    let execution = kode::run(source, "product.kode", options);

    print!("{}", execution.output);
    match execution.result {
        Ok(last) => println!("last value: {last}"),
        Err(e) => eprint!("{}", e.report()),
    }
}
