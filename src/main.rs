use anyhow::Context;
use args::{process_command_line, usage, ProgramSettings};
use cipher::{cipher_factory, transliterate};
use log::{debug, info};
use std::{
    fs,
    io::{self, Read, Write},
};

pub mod args;
pub mod cipher;

fn read_input(path: &str) -> anyhow::Result<String> {
    if path.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read from stdin")?;
        Ok(input)
    } else {
        info!("Reading input from {path}");
        fs::read_to_string(path).with_context(|| format!("failed to read input file '{path}'"))
    }
}

fn write_output(path: &str, text: &str) -> anyhow::Result<()> {
    if path.is_empty() {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}").context("failed to write to stdout")
    } else {
        info!("Writing output to {path}");
        fs::write(path, format!("{text}\n"))
            .with_context(|| format!("failed to write output file '{path}'"))
    }
}

fn run(settings: &ProgramSettings) -> anyhow::Result<()> {
    debug!("{settings:?}");
    let input = transliterate(&read_input(&settings.input_file)?);
    let cipher = cipher_factory(settings.cipher_type, &settings.cipher_key)?;
    let output = String::from_utf8(cipher.apply(settings.cipher_mode, input.as_bytes())?)?;
    write_output(&settings.output_file, &output)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cmd_line_args: Vec<String> = std::env::args().skip(1).collect();
    let mut settings = ProgramSettings::default();
    process_command_line(&cmd_line_args, &mut settings)?;

    if settings.help_requested {
        print!("{}", usage());
        return Ok(());
    }
    if settings.version_requested {
        println!("mpags-cipher {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    run(&settings)
}
