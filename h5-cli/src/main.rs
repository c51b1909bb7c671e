//! h5 command line tokenizer
//!
//! Prints the tokens of an HTML document, one per line.
//!
//! - h5 page.html             # Tokens of a file
//! - h5 --html '<p>Hi</p>'    # Tokens of a string
//! - curl -s URL | h5 --json  # JSON lines from stdin

use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use h5_tokenizer::{
    CharSource, ParseError, SinkControl, StrSource, Token, TokenSink, Tokenizer, TokenizerOptions,
    TokenizerState, Utf8ReadSource,
};
use log::{LevelFilter, info};
use owo_colors::OwoColorize;
use simple_logger::SimpleLogger;

/// h5 - streaming WHATWG HTML tokenizer
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "h5")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Tokenize a file
    h5 index.html

    # Tokenize a string and show parse errors
    h5 --errors --html '<a x=1 x=2>'

    # JSON lines, one token per line
    h5 --json index.html

    # Tokenize the contents of a <script> on their own
    h5 --state ScriptData --last-start-tag script --html 'a</script>b'
"#)]
struct Cli {
    /// HTML file to tokenize (reads stdin when omitted)
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Tokenize this HTML string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Print tokens (and errors) as JSON lines
    #[arg(short, long)]
    json: bool,

    /// Print parse errors to stderr
    #[arg(short, long)]
    errors: bool,

    /// Do not switch to RCDATA/RAWTEXT/script data after <title>, <style>, <script>, ...
    #[arg(long)]
    no_raw_text_switch: bool,

    /// Allow CDATA sections, as in SVG or MathML content
    #[arg(long)]
    cdata: bool,

    /// Initial tokenizer state, e.g. RCDATA or ScriptData
    #[arg(long, value_name = "STATE")]
    state: Option<TokenizerState>,

    /// Treat this tag as the last start tag emitted
    #[arg(long, value_name = "NAME")]
    last_start_tag: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> TokenizerOptions {
        let mut options = TokenizerOptions::default()
            .with_switch_on_raw_text_elements(!self.no_raw_text_switch)
            .with_allow_cdata(self.cdata);
        if let Some(state) = self.state {
            options = options.with_initial_state(state);
        }
        if let Some(name) = &self.last_start_tag {
            options = options.with_last_start_tag_name(name);
        }
        options
    }

    const fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Writes every token to stdout as it arrives.
struct Printer<W> {
    out: W,
    json: bool,
    color: bool,
    show_errors: bool,
    tokens: usize,
    parse_errors: usize,
    /// First write failure, e.g. a closed pipe. Stops tokenization.
    failed: Option<io::Error>,
}

impl<W: Write> Printer<W> {
    fn write_token(&mut self, token: &Token) -> io::Result<()> {
        if self.json {
            let line = serde_json::to_string(token)?;
            return writeln!(self.out, "{line}");
        }
        if !self.color {
            return writeln!(self.out, "{token}");
        }
        match token {
            Token::Doctype { .. } => writeln!(self.out, "{}", token.magenta()),
            Token::StartTag { .. } => writeln!(self.out, "{}", token.cyan()),
            Token::EndTag { .. } => writeln!(self.out, "{}", token.blue()),
            Token::Comment { .. } => writeln!(self.out, "{}", token.green()),
            Token::Text { .. } => writeln!(self.out, "{token}"),
            Token::EndOfInput => writeln!(self.out, "{}", token.dimmed()),
        }
    }
}

impl<W: Write> TokenSink for Printer<W> {
    fn process_token(&mut self, token: Token) -> SinkControl {
        self.tokens += 1;
        match self.write_token(&token) {
            Ok(()) => SinkControl::Continue,
            Err(e) => {
                self.failed = Some(e);
                SinkControl::Stop
            }
        }
    }

    fn parse_error(&mut self, error: &ParseError) {
        self.parse_errors += 1;
        if !self.show_errors {
            return;
        }
        if self.json {
            if let Ok(line) = serde_json::to_string(error) {
                eprintln!("{line}");
            }
        } else {
            eprintln!(
                "{} {} at {}",
                "parse error:".yellow().bold(),
                error.kind.yellow(),
                error.location
            );
        }
    }
}

fn tokenize_into<S: CharSource, W: Write>(
    mut tokenizer: Tokenizer<S>,
    printer: &mut Printer<W>,
) -> Result<()> {
    tokenizer.run(printer).context("tokenization failed")?;
    if let Some(e) = printer.failed.take() {
        return Err(anyhow::Error::new(e).context("failed to write tokens"));
    }
    printer.out.flush().context("failed to write tokens")?;
    info!(
        "{} tokens, {} parse errors",
        printer.tokens, printer.parse_errors
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level())
        .init()
        .context("failed to initialize logging")?;

    let stdout = io::stdout();
    let mut printer = Printer {
        color: !cli.json && stdout.is_terminal(),
        out: stdout.lock(),
        json: cli.json,
        show_errors: cli.errors,
        tokens: 0,
        parse_errors: 0,
        failed: None,
    };
    let options = cli.options();

    if let Some(html) = &cli.html {
        let tokenizer = Tokenizer::with_options(StrSource::new(html.as_str()), options);
        tokenize_into(tokenizer, &mut printer)
    } else if let Some(path) = &cli.path {
        let file =
            File::open(path).with_context(|| format!("failed to open '{}'", path.display()))?;
        let source = Utf8ReadSource::new(BufReader::new(file));
        tokenize_into(Tokenizer::with_options(source, options), &mut printer)
            .with_context(|| format!("while reading '{}'", path.display()))
    } else {
        let source = Utf8ReadSource::new(io::stdin().lock());
        tokenize_into(Tokenizer::with_options(source, options), &mut printer)
    }
}
