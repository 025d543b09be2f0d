use std::io::{self, BufRead, Write};
use std::sync::Arc;

use covercat_core::config::AppConfig;
use covercat_core::{ClientError, FaqCategory, Session};

use super::{exit_code_for, CatalogRuntime, CommandResult, EXIT_OK};

const PRODUCT_PROMPT: &str = "Which young driver product would you like to know more about?";
const PRODUCT_HINT: &str = "Select a product above to continue.";
const QUESTION_PROMPT: &str = "What would you like to know?";

enum ProductChoice {
    Selected(String),
    Quit,
}

enum QuestionChoice {
    Chosen(FaqCategory),
    ChangeProduct,
    Quit,
}

enum Confirmation {
    Show,
    Back,
    Quit,
}

pub fn run(config: &AppConfig) -> CommandResult {
    let catalog = match CatalogRuntime::from_config(config) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::client_failure("browse", &error.into(), false),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match run_with_io(&catalog, stdin.lock(), &mut stdout) {
        Ok(exit_code) => CommandResult::text(exit_code, String::new()),
        Err(error) => CommandResult::failure(
            "browse",
            "terminal_io",
            format!("terminal input/output failed: {error}"),
            super::EXIT_USAGE,
        ),
    }
}

/// Runs the interactive flow until the user quits, input ends, or the catalog
/// cannot be loaded. Returns the process exit code.
pub fn run_with_io<R, W>(catalog: &CatalogRuntime, mut input: R, output: &mut W) -> io::Result<u8>
where
    R: BufRead,
    W: Write,
{
    let mut session = match load_session(catalog, None) {
        Ok(session) => session,
        Err(error) => return halt(output, &error),
    };

    loop {
        // A lapsed TTL swaps in a fresh snapshot before the product menu is shown.
        session = match load_session(catalog, Some(session)) {
            Ok(session) => session,
            Err(error) => return halt(output, &error),
        };

        let name = match prompt_product(&session, &mut input, output)? {
            ProductChoice::Selected(name) => name,
            ProductChoice::Quit => return Ok(EXIT_OK),
        };
        if let Err(error) = session.select_product(&name) {
            writeln!(output, "{error}")?;
            continue;
        }
        writeln!(output, "\nGreat, let's look at {name}")?;

        loop {
            let category = match prompt_question(&session, &mut input, output)? {
                QuestionChoice::Chosen(category) => category,
                QuestionChoice::ChangeProduct => break,
                QuestionChoice::Quit => return Ok(EXIT_OK),
            };
            if let Err(error) = session.choose_category(category) {
                writeln!(output, "{error}")?;
                break;
            }

            match prompt_confirmation(&mut input, output)? {
                Confirmation::Show => match session.confirm() {
                    Ok(answer) => writeln!(output, "\n{}\n", answer.to_text())?,
                    Err(error) => writeln!(output, "{error}")?,
                },
                Confirmation::Back => continue,
                Confirmation::Quit => return Ok(EXIT_OK),
            }
        }
    }
}

fn load_session(catalog: &CatalogRuntime, current: Option<Session>) -> Result<Session, ClientError> {
    let snapshot = catalog.snapshot()?;
    match current {
        Some(session) if Arc::ptr_eq(session.catalog(), &snapshot) => Ok(session),
        _ => Ok(Session::start(snapshot)?),
    }
}

fn halt<W: Write>(output: &mut W, error: &ClientError) -> io::Result<u8> {
    writeln!(output, "{}", error.user_message())?;
    Ok(exit_code_for(error))
}

fn prompt_product<R, W>(session: &Session, input: &mut R, output: &mut W) -> io::Result<ProductChoice>
where
    R: BufRead,
    W: Write,
{
    let names = session.product_names();

    loop {
        writeln!(output, "\n{PRODUCT_PROMPT}")?;
        for (index, name) in names.iter().enumerate() {
            writeln!(output, "  {}. {name}", index + 1)?;
        }
        write!(output, "Select a product... [1-{}, q to quit]: ", names.len())?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(ProductChoice::Quit);
        };
        match line.as_str() {
            "" => writeln!(output, "{PRODUCT_HINT}")?,
            "q" | "quit" => return Ok(ProductChoice::Quit),
            other => match parse_index(other, names.len()) {
                Some(index) => return Ok(ProductChoice::Selected(names[index].to_string())),
                None => writeln!(output, "Please choose a number between 1 and {}.", names.len())?,
            },
        }
    }
}

fn prompt_question<R, W>(
    session: &Session,
    input: &mut R,
    output: &mut W,
) -> io::Result<QuestionChoice>
where
    R: BufRead,
    W: Write,
{
    let pending = session.pending_category();
    let default_index =
        FaqCategory::ALL.iter().position(|category| *category == pending).unwrap_or(0) + 1;

    loop {
        writeln!(output, "\n{QUESTION_PROMPT}")?;
        for (index, category) in FaqCategory::ALL.iter().enumerate() {
            writeln!(output, "  {}. {}", index + 1, category.label())?;
        }
        write!(
            output,
            "Choose a question [1-{}, Enter for {default_index}, p for another product, q to quit]: ",
            FaqCategory::ALL.len()
        )?;
        output.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(QuestionChoice::Quit);
        };
        match line.as_str() {
            "" => return Ok(QuestionChoice::Chosen(pending)),
            "p" => return Ok(QuestionChoice::ChangeProduct),
            "q" | "quit" => return Ok(QuestionChoice::Quit),
            other => match parse_index(other, FaqCategory::ALL.len()) {
                Some(index) => return Ok(QuestionChoice::Chosen(FaqCategory::ALL[index])),
                None => match other.parse::<FaqCategory>() {
                    Ok(category) => return Ok(QuestionChoice::Chosen(category)),
                    Err(_) => writeln!(
                        output,
                        "Please choose a number between 1 and {}.",
                        FaqCategory::ALL.len()
                    )?,
                },
            },
        }
    }
}

fn prompt_confirmation<R, W>(input: &mut R, output: &mut W) -> io::Result<Confirmation>
where
    R: BufRead,
    W: Write,
{
    write!(output, "Show information? [Enter to show, b to go back, q to quit]: ")?;
    output.flush()?;

    Ok(match read_line(input)?.as_deref() {
        None | Some("q") | Some("quit") => Confirmation::Quit,
        Some("b") | Some("back") => Confirmation::Back,
        Some(_) => Confirmation::Show,
    })
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn parse_index(value: &str, len: usize) -> Option<usize> {
    value.parse::<usize>().ok().filter(|number| (1..=len).contains(number)).map(|number| number - 1)
}
