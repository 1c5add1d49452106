use anyhow::Error;
use std::io::{self, Write};

pub const SEPARATOR: &str = "*-----------------------------------------------*";

const BANNER: [&str; 6] = [
    r"      ______________________________",
    r"    / \                             \ ",
    r"   |   |        Sage Tea Leaves      |",
    r"    \_ |   __________________________|___",
    r"       |  /                            / ",
    r"       \_/____________________________/ ",
];

pub fn write_banner(out: &mut dyn Write) {
    for line in BANNER {
        let _ = writeln!(out, "{line}");
    }
}

/// Section heading: title indented under the previous separator, then a separator.
pub fn write_heading(out: &mut dyn Write, title: &str) {
    let _ = writeln!(out, "          {title}");
    let _ = writeln!(out, "{SEPARATOR}");
}

pub fn write_separator(out: &mut dyn Write) {
    let _ = writeln!(out, "{SEPARATOR}");
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next:");
    let _ = writeln!(stderr, "  - rerun with `--verbose` for diagnostics");
    let _ = writeln!(
        stderr,
        "  - see `tealeaves --help` for the available options"
    );
}
