use std::env;
use std::process;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use getopts::Options;
use log::Level;

use vaudenay::{HttpOracle, MessageCracker, VaudenayError, DEFAULT_ORACLE_URL};

const EXIT_USAGE: i32 = 1;
const EXIT_TRANSPORT: i32 = 2;
const EXIT_ATTACK: i32 = 3;

fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage: {} [options] CIPHERTEXT\n\nCIPHERTEXT is the IV followed by the encrypted blocks, in hexadecimal.", program);
    eprint!("{}", opts.usage(&brief));
}

fn decode(argument: &str, base64: bool) -> Result<Vec<u8>, VaudenayError> {
    let argument = argument.trim();
    if base64 {
        Ok(STANDARD.decode(argument)?)
    } else {
        Ok(hex::decode(argument)?)
    }
}

fn program_name(args: &mut impl Iterator<Item = String>) -> String {
    args.next().unwrap_or_else(|| "vaudenay".to_owned())
}

fn main() {
    let mut args = env::args();
    let program = program_name(&mut args);
    let args: Vec<String> = args.collect();

    let mut opts = Options::new();
    opts.optopt(
        "u",
        "url",
        &format!("Padding oracle check endpoint. Defaults to {}", DEFAULT_ORACLE_URL),
        "URL",
    );
    opts.optflag("b", "base64", "CIPHERTEXT is Base64 instead of hexadecimal");
    opts.optflag("j", "parallel", "Crack blocks in parallel");
    opts.optflagmulti("v", "verbose", "Log progress, twice for every byte");
    opts.optflag("h", "help", "Print this help menu");
    let matches = match opts.parse(&args) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            print_usage(&program, &opts);
            process::exit(EXIT_USAGE);
        }
    };
    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return;
    }
    if matches.free.len() != 1 {
        print_usage(&program, &opts);
        process::exit(EXIT_USAGE);
    }

    let level = match matches.opt_count("v") {
        0 => Level::Warn,
        1 => Level::Info,
        _ => Level::Debug,
    };
    let _ = simple_logger::init_with_level(level);

    let ciphertext = match decode(&matches.free[0], matches.opt_present("b")) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("** {}", e);
            process::exit(EXIT_USAGE);
        }
    };

    let url = matches
        .opt_str("u")
        .unwrap_or_else(|| DEFAULT_ORACLE_URL.to_string());
    let oracle = match HttpOracle::new(&url) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("** {}", e);
            process::exit(EXIT_TRANSPORT);
        }
    };

    let cracker = MessageCracker::new(&oracle);
    let result = if matches.opt_present("j") {
        cracker.crack_parallel(&ciphertext)
    } else {
        cracker.crack(&ciphertext)
    };

    match result {
        Ok(plaintext) => println!("{}", String::from_utf8_lossy(&plaintext)),
        Err(e @ VaudenayError::OracleTransport { .. }) => {
            eprintln!("** connection problem: {}", e);
            eprintln!("** Is the padding oracle running at {}?", oracle.url());
            process::exit(EXIT_TRANSPORT);
        }
        Err(VaudenayError::InvalidPadding(partial)) => {
            eprintln!("** recovered plaintext has invalid padding");
            eprintln!("** recovered bytes (HEX): {}", hex::encode(partial));
            process::exit(EXIT_ATTACK);
        }
        Err(e) => {
            eprintln!("** {}", e);
            process::exit(EXIT_ATTACK);
        }
    }
}
