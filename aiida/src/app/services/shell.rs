// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2026 Alex Sizykh

/// Single-quotes a word for `sh -c`.
pub fn sh_escape(p: &str) -> String {
    let mut out = String::from("'");
    out.push_str(&p.replace('\'', r"'\''"));
    out.push('\'');
    out
}

/// Shell snippet that exits 0 when `program` resolves on PATH.
pub fn command_exists_script(program: &str) -> String {
    format!("command -v {} >/dev/null 2>&1", sh_escape(program))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_embedded_single_quotes() {
        assert_eq!(sh_escape("it's"), r"'it'\''s'");
    }

    #[test]
    fn command_exists_script_quotes_program() {
        assert_eq!(
            command_exists_script("sbatch"),
            "command -v 'sbatch' >/dev/null 2>&1"
        );
    }
}
