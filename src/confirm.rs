//! Operator confirmation before a run starts.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// What a run is about to do, shown to the operator before it starts.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub postcli_path: PathBuf,
    pub data_dir: PathBuf,
    pub fraction: f64,
    pub total_files: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
}

fn parse_answer(line: &str) -> Option<Answer> {
    match line.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" => Some(Answer::Yes),
        "no" | "n" => Some(Answer::No),
        _ => None,
    }
}

pub fn write_plan<W: Write>(out: &mut W, plan: &RunPlan) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Confirmation required")?;
    writeln!(out, "postcli path: {}", plan.postcli_path.display())?;
    writeln!(out, "Data directory: {}", plan.data_dir.display())?;
    writeln!(out, "Fraction to verify: {}", plan.fraction)?;
    writeln!(out, "Total files to validate: {}", plan.total_files)?;
    Ok(())
}

/// Ask until the operator answers yes or no. End of input counts as no.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(out, "\nStart validation? (yes/no): ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(false);
        }
        match parse_answer(&line) {
            Some(Answer::Yes) => return Ok(true),
            Some(Answer::No) => return Ok(false),
            None => writeln!(out, "Please answer with 'yes' or 'no'.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::{RunPlan, confirm, write_plan};

    fn ask(script: &str) -> (bool, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let answer = confirm(&mut input, &mut out).expect("confirm");
        (answer, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn accepts_yes_variants() {
        for reply in ["yes\n", "y\n", "YES\n", "Y\n", "  Yes  \n"] {
            assert!(ask(reply).0, "reply {reply:?}");
        }
    }

    #[test]
    fn accepts_no_variants() {
        for reply in ["no\n", "n\n", "NO\n", "No\n"] {
            assert!(!ask(reply).0, "reply {reply:?}");
        }
    }

    #[test]
    fn reprompts_on_unrecognised_input() {
        let (answer, out) = ask("maybe\n\nsure\nyes\n");
        assert!(answer);
        assert_eq!(out.matches("Please answer with 'yes' or 'no'.").count(), 3);
        assert_eq!(out.matches("Start validation? (yes/no): ").count(), 4);
    }

    #[test]
    fn end_of_input_declines() {
        let (answer, out) = ask("what\n");
        assert!(!answer);
        assert_eq!(out.matches("Please answer").count(), 1);
    }

    #[test]
    fn plan_lists_run_parameters() {
        let plan = RunPlan {
            postcli_path: PathBuf::from("/opt/postcli"),
            data_dir: PathBuf::from("/data/post"),
            fraction: 0.001,
            total_files: 4,
        };
        let mut out = Vec::new();
        write_plan(&mut out, &plan).expect("write plan");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("postcli path: /opt/postcli"));
        assert!(text.contains("Data directory: /data/post"));
        assert!(text.contains("Fraction to verify: 0.001"));
        assert!(text.contains("Total files to validate: 4"));
    }
}
