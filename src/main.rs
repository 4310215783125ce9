use clap::{arg,crate_version,ArgAction,Command};
use chunkpress::Format;
use std::io::{self,IsTerminal,Write};
use std::path::{Path,PathBuf};

const KNOWN_EXTENSIONS: &str = "lzb, lza, rlh, bwlzhd, bwlz3, mra";

fn main() {
    env_logger::init();
    std::process::exit(run());
}

fn run() -> i32 {
    let long_help =
"Examples:
---------
Compress:    chunkpress -i report.txt -o report.lzb
Decompress:  chunkpress -i report.lzb -o report.txt
Decompress:  chunkpress -e -i report.lzb";

    let cmd = Command::new("chunkpress")
        .about("Compress and expand files with the LZB/LZA/RLH/BWLZHD/BWLZ3/MRA container formats")
        .after_long_help(long_help)
        .disable_version_flag(true)
        .arg(arg!(-e --extract "force decompression regardless of input extension").action(ArgAction::SetTrue))
        .arg(arg!(-i --input <PATH> "input path").required_unless_present("version"))
        .arg(arg!(-o --output <PATH> "output path (default derived from input)"))
        .arg(arg!(-r --replace "overwrite the output file without prompting").action(ArgAction::SetTrue))
        .arg(arg!(-v --version "print version and exit").action(ArgAction::SetTrue));

    let matches = cmd.get_matches();

    if matches.get_flag("version") {
        println!("chunkpress {}", crate_version!());
        return 0;
    }

    let input = matches.get_one::<String>("input").expect("required");
    let input_path = Path::new(input);
    if !input_path.exists() {
        eprintln!("chunkpress: input not found: {}", input_path.display());
        return 2;
    }

    let extract = matches.get_flag("extract");
    let output_arg = matches.get_one::<String>("output").map(PathBuf::from);
    let replace = matches.get_flag("replace");

    let input_format = input_path.extension().and_then(|e| e.to_str()).and_then(Format::from_extension);
    let decompress_mode = extract || input_format.is_some();

    let (format, output_path) = if decompress_mode {
        let format = match input_format {
            Some(f) => f,
            None => {
                eprintln!("chunkpress: -e given but input extension is not one of: {}", KNOWN_EXTENSIONS);
                return 1;
            }
        };
        let out = output_arg.unwrap_or_else(|| input_path.with_extension(""));
        (format, out)
    } else {
        let out_format = output_arg.as_ref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .and_then(Format::from_extension);
        let format = match out_format {
            Some(f) => f,
            None => {
                eprintln!("chunkpress: compressing requires -o with a recognized extension ({})", KNOWN_EXTENSIONS);
                return 1;
            }
        };
        (format, output_arg.expect("out_format requires output_arg"))
    };

    if output_path.exists() && !replace && !confirm_overwrite(&output_path) {
        eprintln!("chunkpress: not overwriting {}", output_path.display());
        return 17;
    }

    let data = match std::fs::read(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("chunkpress: failed to read {}: {}", input_path.display(), e);
            return 1;
        }
    };

    log::debug!("chunkpress: {} {} ({} bytes) -> {}", if decompress_mode { "decompressing" } else { "compressing" }, input_path.display(), data.len(), output_path.display());

    let result = if decompress_mode {
        chunkpress::decompress(format, &data)
    } else {
        chunkpress::compress(format, &data)
    };

    let output_bytes = match result {
        Ok(b) => b,
        Err(e) => {
            eprintln!("chunkpress: {}", e);
            return 1;
        }
    };

    if let Err(e) = std::fs::write(&output_path, output_bytes) {
        eprintln!("chunkpress: failed to write {}: {}", output_path.display(), e);
        return 1;
    }

    0
}

/// Interactively prompt on a TTY before overwriting an existing output file.
/// Any non-TTY stdin (piped, redirected, or simply absent)
/// declines the overwrite rather than blocking.
fn confirm_overwrite(path: &Path) -> bool {
    if !io::stdin().is_terminal() {
        return false;
    }
    eprint!("chunkpress: {} exists, overwrite? [y/N] ", path.display());
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
