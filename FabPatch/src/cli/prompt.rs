//! Interactive prompts

use std::io;

use console::Term;

/// Ask a yes/no question. Only `y`/`Y` counts as yes.
pub fn confirm(term: &Term, question: &str) -> io::Result<bool> {
    term.write_str(&format!("{question} (y/n): "))?;
    let answer = term.read_line()?;
    Ok(is_yes(&answer))
}

/// Ask for the target version, falling back to `default` on empty input.
pub fn ask_target_version(term: &Term, default: &str) -> io::Result<String> {
    term.write_str(&format!(
        "Enter the target Minecraft version (or press Enter for default {default}): "
    ))?;
    let answer = term.read_line()?;
    Ok(resolve_version(&answer, default))
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

fn resolve_version(answer: &str, default: &str) -> String {
    let answer = answer.trim();
    if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    }
}
