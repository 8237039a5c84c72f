use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tracing::{debug, info, warn};

use crate::{
    CalError,
    calculator::{Calculator, Operation},
    utils::{check_exponent, format_result, validate_input},
};

pub const DEFAULT_PRECISION: usize = 2;
pub const DEFAULT_MAX_EXPONENT: u64 = 10_000;

/// Source of user input lines. `None` means the user asked to leave.
pub trait Prompt {
    fn prompt(&mut self, message: &str) -> Result<Option<String>, ReadlineError>;
}

impl Prompt for DefaultEditor {
    fn prompt(&mut self, message: &str) -> Result<Option<String>, ReadlineError> {
        match self.readline(message) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) => {
                debug!("CTRL-C");
                Ok(None)
            }
            Err(ReadlineError::Eof) => {
                debug!("CTRL-D");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellOptions {
    pub precision: usize,
    pub max_exponent: u64,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            max_exponent: DEFAULT_MAX_EXPONENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Shell<P: Prompt, W: Write> {
    calculator: Calculator,
    input: P,
    out: W,
    options: ShellOptions,
}

impl<P: Prompt, W: Write> Shell<P, W> {
    pub fn new(input: P, out: W, options: ShellOptions) -> Self {
        Self {
            calculator: Calculator::new(),
            input,
            out,
            options,
        }
    }

    pub fn run(&mut self) -> Result<(), CalError> {
        info!(options = ?self.options, "starting shell");
        writeln!(self.out, "Welcome to Cal!")?;
        writeln!(self.out, "================================")?;

        loop {
            writeln!(self.out)?;
            writeln!(self.out, "Choose an option:")?;
            writeln!(self.out, "1. Perform calculation")?;
            writeln!(self.out, "2. View supported operations")?;
            writeln!(self.out, "3. Exit")?;
            self.out.flush()?;

            let Some(choice) = self.input.prompt("Enter your choice (1-3): ")? else {
                break;
            };

            match choice.trim() {
                "1" => {
                    if self.calculate()? == Flow::Exit {
                        break;
                    }
                }
                "2" => self.show_supported_operations()?,
                "3" => break,
                other => {
                    debug!(choice = other, "invalid menu choice");
                    writeln!(self.out, "Invalid choice. Please enter 1, 2, or 3.")?;
                }
            }
        }

        writeln!(self.out, "Thank you for using Cal! Goodbye!")?;
        self.out.flush()?;
        Ok(())
    }

    fn calculate(&mut self) -> Result<Flow, CalError> {
        let operator_prompt = format!(
            "Enter operation ({}): ",
            self.calculator.supported_operations().join(", ")
        );

        loop {
            let Some(first) = self.input.prompt("Enter first number: ")? else {
                return Ok(Flow::Exit);
            };
            let Some(left) = self.read_operand(&first)? else {
                return Ok(Flow::Continue);
            };

            let Some(operator) = self.input.prompt(&operator_prompt)? else {
                return Ok(Flow::Exit);
            };
            let operator = operator.trim();

            let Some(second) = self.input.prompt("Enter second number: ")? else {
                return Ok(Flow::Exit);
            };
            let Some(right) = self.read_operand(&second)? else {
                return Ok(Flow::Continue);
            };

            if let Err(err) = check_exponent(operator, right, self.options.max_exponent) {
                warn!(%err, "exponent rejected");
                writeln!(self.out, "Error: {}", err)?;
                return Ok(Flow::Continue);
            }

            match self.calculator.perform(left, right, operator) {
                Ok(result) => writeln!(
                    self.out,
                    "Result: {}",
                    format_result(left, operator, right, result, self.options.precision)
                )?,
                Err(err) => {
                    writeln!(self.out, "Error: {}", err)?;
                    return Ok(Flow::Continue);
                }
            }

            writeln!(self.out)?;
            self.out.flush()?;
            let Some(again) = self
                .input
                .prompt("Would you like to perform another calculation? (y/n): ")?
            else {
                return Ok(Flow::Exit);
            };

            if !matches!(again.trim().to_lowercase().as_str(), "y" | "yes") {
                return Ok(Flow::Continue);
            }
        }
    }

    fn read_operand(&mut self, line: &str) -> Result<Option<f64>, CalError> {
        match validate_input(line) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                debug!(%err, "rejected operand");
                writeln!(self.out, "Invalid number ({}). Please enter a valid number.", err)?;
                Ok(None)
            }
        }
    }

    fn show_supported_operations(&mut self) -> Result<(), CalError> {
        writeln!(self.out)?;
        writeln!(self.out, "Supported Operations:")?;
        for op in Operation::ALL {
            let names = format!("{} or {}", op.to_symbol(), op.alias());
            writeln!(self.out, "{:<14}: {}", names, op.description())?;
        }
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Note: Division by zero is not allowed and will return an error."
        )?;
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    struct Script {
        lines: VecDeque<String>,
        prompts: Vec<String>,
    }

    impl Script {
        fn new(lines: &[&str]) -> Self {
            Self {
                lines: lines.iter().map(|l| l.to_string()).collect(),
                prompts: Vec::new(),
            }
        }
    }

    impl Prompt for Script {
        fn prompt(&mut self, message: &str) -> Result<Option<String>, ReadlineError> {
            self.prompts.push(message.to_string());
            Ok(self.lines.pop_front())
        }
    }

    fn run_script(lines: &[&str], options: ShellOptions) -> String {
        let mut shell = Shell::new(Script::new(lines), Vec::new(), options);
        shell.run().unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    fn run(lines: &[&str]) -> String {
        run_script(lines, ShellOptions::default())
    }

    #[test]
    fn test_exit_from_menu() {
        let out = run(&["3"]);
        assert!(out.starts_with("Welcome to Cal!"));
        assert!(out.contains("1. Perform calculation"));
        assert!(out.ends_with("Thank you for using Cal! Goodbye!\n"));
    }

    #[test]
    fn test_end_of_input_leaves_shell() {
        let out = run(&[]);
        assert!(out.contains("Goodbye!"));

        let out = run(&["1", "5"]);
        assert!(out.contains("Goodbye!"));
        assert!(!out.contains("Result:"));
    }

    #[test]
    fn test_single_calculation() {
        let out = run(&["1", "10", "/", "3", "n", "3"]);
        assert!(out.contains("Result: 10.00 / 3.00 = 3.33"));
    }

    #[test]
    fn test_word_alias_and_precision() {
        let options = ShellOptions {
            precision: 0,
            ..ShellOptions::default()
        };
        let out = run_script(&["1", " 2 ", "power", "10", "no", "3"], options);
        assert!(out.contains("Result: 2 power 10 = 1024"));
    }

    #[test]
    fn test_repeat_calculation() {
        let out = run(&["1", "5", "+", "3", "Y", "6", "*", "7", "yes", "2", "^", "3", "n", "3"]);
        assert!(out.contains("Result: 5.00 + 3.00 = 8.00"));
        assert!(out.contains("Result: 6.00 * 7.00 = 42.00"));
        assert!(out.contains("Result: 2.00 ^ 3.00 = 8.00"));
    }

    #[test]
    fn test_invalid_number_skips_dispatch() {
        let out = run(&["1", "abc", "3"]);
        assert!(out.contains("Invalid number (invalid number format: \"abc\"). Please enter a valid number."));
        assert!(!out.contains("Result:"));

        let out = run(&["1", "4", "+", "", "3"]);
        assert!(out.contains("Invalid number (input cannot be empty)."));
        assert!(!out.contains("Result:"));
    }

    #[test]
    fn test_dispatch_errors_are_reported() {
        let out = run(&["1", "5", "/", "0", "1", "5", "%", "3", "3"]);
        assert!(out.contains("Error: division by zero is not allowed"));
        assert!(out.contains("Error: unsupported operation: %"));
        assert!(!out.contains("Result:"));
    }

    #[test]
    fn test_invalid_menu_choice() {
        let out = run(&["9", "3"]);
        assert!(out.contains("Invalid choice. Please enter 1, 2, or 3."));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_supported_operations_screen() {
        let out = run(&["2", "3"]);
        assert!(out.contains("Supported Operations:"));
        assert!(out.contains("+ or add      : Addition"));
        assert!(out.contains("- or subtract : Subtraction"));
        assert!(out.contains("* or multiply : Multiplication"));
        assert!(out.contains("/ or divide   : Division"));
        assert!(out.contains("^ or power    : Power (exponentiation)"));
        assert!(out.contains("Note: Division by zero is not allowed"));
    }

    #[test]
    fn test_exponent_bound() {
        let options = ShellOptions {
            max_exponent: 10,
            ..ShellOptions::default()
        };
        let out = run_script(&["1", "2", "^", "11", "1", "2", "^", "10", "n", "3"], options);
        assert!(out.contains("Error: exponent 11 exceeds the maximum of 10"));
        assert!(out.contains("Result: 2.00 ^ 10.00 = 1024.00"));
    }

    #[test]
    fn test_operator_prompt_lists_symbols() {
        let mut shell = Shell::new(
            Script::new(&["1", "1", "+", "1", "n", "3"]),
            Vec::new(),
            ShellOptions::default(),
        );
        shell.run().unwrap();
        assert!(
            shell
                .input
                .prompts
                .contains(&String::from("Enter operation (+, -, *, /, ^): "))
        );
    }
}
