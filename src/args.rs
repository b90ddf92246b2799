use clap::ValueEnum;
use derive_more::Display;

/// Direction the selected cipher runs in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CipherMode {
    #[default]
    Encrypt,
    Decrypt,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CipherType {
    #[default]
    Caesar,
    Playfair,
    Vigenere,
}

/// Settings of the program that can be modified by command-line arguments.
/// Empty strings mean the corresponding option was not given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramSettings {
    pub help_requested: bool,
    pub version_requested: bool,
    pub input_file: String,
    pub output_file: String,
    pub cipher_key: String,
    pub cipher_mode: CipherMode,
    pub cipher_type: CipherType,
}

/// Errors raised while scanning the command line
#[derive(Debug, Display, PartialEq, Eq)]
pub enum ParseError {
    /// A value-bearing option was the last token
    #[display(fmt = "{} requires a {} argument", option, expects)]
    MissingArgument {
        option: &'static str,
        expects: &'static str,
    },
    /// An unrecognized token, or an unrecognized value of `-c/--cipher`
    #[display(fmt = "unknown {} '{}'", kind, value)]
    UnknownArgument { kind: &'static str, value: String },
}

impl std::error::Error for ParseError {}

fn value_of<'a>(
    next: Option<&'a str>,
    option: &'static str,
    expects: &'static str,
) -> Result<&'a str, ParseError> {
    next.ok_or(ParseError::MissingArgument { option, expects })
}

/// Scans `args` (program name excluded) left to right and updates `settings`.
///
/// Scanning stops at the first help or version flag, leaving later tokens
/// unexamined. On error, assignments made by earlier tokens stay applied.
pub fn process_command_line<S: AsRef<str>>(
    args: &[S],
    settings: &mut ProgramSettings,
) -> Result<(), ParseError> {
    let mut args = args.iter().map(AsRef::<str>::as_ref);
    while let Some(arg) = args.next() {
        match arg {
            "-h" | "--help" => {
                settings.help_requested = true;
                break;
            }
            "--version" => {
                settings.version_requested = true;
                break;
            }
            "-i" | "--infile" => {
                settings.input_file = value_of(args.next(), "-i/--infile", "filename")?.to_owned();
            }
            "-o" | "--outfile" => {
                settings.output_file =
                    value_of(args.next(), "-o/--outfile", "filename")?.to_owned();
            }
            "-k" | "--key" => {
                settings.cipher_key = value_of(args.next(), "-k/--key", "string")?.to_owned();
            }
            "--encrypt" => settings.cipher_mode = CipherMode::Encrypt,
            "--decrypt" => settings.cipher_mode = CipherMode::Decrypt,
            "-c" | "--cipher" => {
                let name = value_of(args.next(), "-c/--cipher", "string")?;
                settings.cipher_type = <CipherType as ValueEnum>::from_str(name, false)
                    .map_err(|_| ParseError::UnknownArgument {
                        kind: "cipher",
                        value: name.to_owned(),
                    })?;
            }
            unknown => {
                return Err(ParseError::UnknownArgument {
                    kind: "argument",
                    value: unknown.to_owned(),
                })
            }
        }
    }
    Ok(())
}

/// Usage text printed for `-h/--help`
pub fn usage() -> String {
    let names = CipherType::value_variants()
        .iter()
        .filter_map(|c| c.to_possible_value())
        .map(|v| v.get_name().to_owned())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Usage: mpags-cipher [-h/--help] [--version] [-i <file>] [-o <file>] \
         [-k <key>] [--encrypt/--decrypt] [-c <cipher>]\n\n\
         Encrypts/Decrypts input alphanumeric text using classical ciphers\n\n\
         Available options:\n\n  \
         -h|--help        Print this help message and exit\n\n  \
         --version        Print version information\n\n  \
         -i|--infile FILE Read text to be processed from FILE\n                   \
         Stdin will be used if not supplied\n\n  \
         -o|--outfile FILE\n                   \
         Write processed text to FILE\n                   \
         Stdout will be used if not supplied\n\n  \
         -k|--key KEY     Specify the cipher KEY\n                   \
         A null key, i.e. no encryption, is used if not supplied\n\n  \
         --encrypt        Will use the cipher to encrypt the input text (default behaviour)\n\n  \
         --decrypt        Will use the cipher to decrypt the input text\n\n  \
         -c|--cipher CIPHER\n                   \
         Specify the cipher to use, one of: {names}\n                   \
         caesar is used if not supplied\n"
    )
}

#[cfg(test)]
mod process_command_line_test {
    use super::{process_command_line, usage, CipherMode, CipherType, ParseError, ProgramSettings};

    fn parse(args: &[&str]) -> (ProgramSettings, Result<(), ParseError>) {
        let mut settings = ProgramSettings::default();
        let result = process_command_line(args, &mut settings);
        (settings, result)
    }

    #[test]
    fn test_empty_keeps_defaults() {
        let (settings, result) = parse(&[]);
        assert_eq!(result, Ok(()));
        assert_eq!(settings, ProgramSettings::default());
    }

    #[test]
    fn test_full_happy_path() {
        let (settings, result) = parse(&[
            "-i", "in.txt", "-o", "out.txt", "-k", "SECRET", "--encrypt", "-c", "playfair",
        ]);
        assert_eq!(result, Ok(()));
        assert_eq!(settings.input_file, "in.txt");
        assert_eq!(settings.output_file, "out.txt");
        assert_eq!(settings.cipher_key, "SECRET");
        assert_eq!(settings.cipher_mode, CipherMode::Encrypt);
        assert_eq!(settings.cipher_type, CipherType::Playfair);
        assert!(!settings.help_requested);
        assert!(!settings.version_requested);
    }

    #[test]
    fn test_long_forms() {
        let (settings, result) = parse(&[
            "--infile", "a", "--outfile", "b", "--key", "c", "--decrypt", "--cipher", "vigenere",
        ]);
        assert_eq!(result, Ok(()));
        assert_eq!(settings.input_file, "a");
        assert_eq!(settings.output_file, "b");
        assert_eq!(settings.cipher_key, "c");
        assert_eq!(settings.cipher_mode, CipherMode::Decrypt);
        assert_eq!(settings.cipher_type, CipherType::Vigenere);
    }

    #[test]
    fn test_absent_options_untouched() {
        let mut settings = ProgramSettings {
            output_file: "keep.txt".to_owned(),
            cipher_type: CipherType::Vigenere,
            ..Default::default()
        };
        process_command_line(&["-i", "in.txt"], &mut settings).unwrap();
        assert_eq!(settings.input_file, "in.txt");
        assert_eq!(settings.output_file, "keep.txt");
        assert_eq!(settings.cipher_type, CipherType::Vigenere);
    }

    #[test]
    fn test_last_write_wins() {
        let (settings, result) = parse(&["-k", "A", "-k", "B", "--key", "C", "-k", "D"]);
        assert_eq!(result, Ok(()));
        assert_eq!(settings.cipher_key, "D");

        let (settings, _) = parse(&["--decrypt", "--encrypt", "-c", "playfair", "-c", "caesar"]);
        assert_eq!(settings.cipher_mode, CipherMode::Encrypt);
        assert_eq!(settings.cipher_type, CipherType::Caesar);
    }

    #[test]
    fn test_help_short_circuits() {
        let (settings, result) = parse(&["-h", "--bogus"]);
        assert_eq!(result, Ok(()));
        assert!(settings.help_requested);

        let (settings, result) = parse(&["-k", "A", "--help", "-k", "B", "-i"]);
        assert_eq!(result, Ok(()));
        assert!(settings.help_requested);
        assert_eq!(settings.cipher_key, "A");
    }

    #[test]
    fn test_version_short_circuits() {
        let (settings, result) = parse(&["--version", "-h", "-c", "rot13"]);
        assert_eq!(result, Ok(()));
        assert!(settings.version_requested);
        assert!(!settings.help_requested);
    }

    #[test]
    fn test_missing_argument() {
        let (_, result) = parse(&["-i"]);
        let err = result.unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingArgument {
                option: "-i/--infile",
                expects: "filename"
            }
        );
        assert_eq!(err.to_string(), "-i/--infile requires a filename argument");

        for (args, option) in [
            (["-o"], "-o/--outfile"),
            (["--key"], "-k/--key"),
            (["--cipher"], "-c/--cipher"),
        ] {
            let (_, result) = parse(&args);
            assert!(result.unwrap_err().to_string().starts_with(option));
        }
    }

    #[test]
    fn test_unknown_cipher() {
        let (_, result) = parse(&["-c", "rot13"]);
        let err = result.unwrap_err();
        assert!(matches!(err, ParseError::UnknownArgument { .. }));
        assert_eq!(err.to_string(), "unknown cipher 'rot13'");
    }

    #[test]
    fn test_cipher_name_is_case_sensitive() {
        let (_, result) = parse(&["-c", "Caesar"]);
        assert!(result.unwrap_err().to_string().contains("Caesar"));
    }

    #[test]
    fn test_unknown_argument() {
        let (_, result) = parse(&["--bogus"]);
        assert_eq!(result.unwrap_err().to_string(), "unknown argument '--bogus'");

        for token in ["--help=1", "-ik", "--in", "-H", "--infile=a.txt"] {
            let (_, result) = parse(&[token]);
            assert!(result.unwrap_err().to_string().contains(token));
        }
    }

    #[test]
    fn test_partial_mutation_before_error() {
        let (settings, result) = parse(&["-i", "in.txt", "--decrypt", "--bogus", "-o", "out.txt"]);
        assert!(result.is_err());
        assert_eq!(settings.input_file, "in.txt");
        assert_eq!(settings.cipher_mode, CipherMode::Decrypt);
        assert_eq!(settings.output_file, "");
    }

    #[test]
    fn test_value_taken_verbatim() {
        let (settings, result) = parse(&["-k", "-o", "-i", "--help"]);
        assert_eq!(result, Ok(()));
        assert_eq!(settings.cipher_key, "-o");
        assert_eq!(settings.input_file, "--help");
        assert!(!settings.help_requested);

        let (settings, _) = parse(&["-k", "", "-o", " ! "]);
        assert_eq!(settings.cipher_key, "");
        assert_eq!(settings.output_file, " ! ");
    }

    #[test]
    fn test_owned_tokens() {
        let args: Vec<String> = vec!["-c".into(), "caesar".into(), "-k".into(), "3".into()];
        let mut settings = ProgramSettings::default();
        process_command_line(&args, &mut settings).unwrap();
        assert_eq!(settings.cipher_key, "3");
    }

    #[test]
    fn test_usage_lists_ciphers() {
        assert!(usage().contains("caesar, playfair, vigenere"));
    }
}
