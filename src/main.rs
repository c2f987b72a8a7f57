use std::env;
use std::path::Path;
use std::process::ExitCode;

use octal_assembler::driver::assemble_all;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: octal-assembler FILE.as [FILE.as ...]");
        return ExitCode::FAILURE;
    }

    let paths: Vec<&Path> = args[1..].iter().map(Path::new).collect();
    if assemble_all(&paths) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
