use anyhow::{Context, Result};
use console::{Style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pwmeter::strength::{Evaluation, Severity, StrengthLevel};
use pwmeter::{Alphabet, GenerationConfig};
use rpassword::read_password;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use zeroize::Zeroizing;

pub const MIN_SAFE_ENTROPY: f64 = 60.0;
pub const STRONG_ENTROPY: f64 = 100.0;

pub const MAX_PASSWORD_BYTES: usize = 1024 * 1024;

const ASCII_SENTIMENTS: [&str; 5] = [":(", ":/", ":|", ":)", "B)"];

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

pub fn get_criterion_marks(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✅", "❌")
    } else {
        ("[x]", "[ ]")
    }
}

pub fn sentiment_marker(level: StrengthLevel, unicode_support: bool) -> &'static str {
    if unicode_support {
        level.sentiment()
    } else {
        ASCII_SENTIMENTS
            .get(level.index())
            .copied()
            .unwrap_or(":)")
    }
}

fn severity_style(severity: Severity, options: &DisplayOptions) -> Style {
    if !options.color_support {
        return Style::new();
    }
    match severity {
        Severity::Error => Style::new().red(),
        Severity::Warning => Style::new().yellow(),
        Severity::Success => Style::new().green(),
    }
}

fn check_password_size(password: &str) -> Result<()> {
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    if password.len() > MAX_PASSWORD_BYTES {
        anyhow::bail!(
            "Password too long ({} bytes, maximum is {})",
            password.len(),
            MAX_PASSWORD_BYTES
        );
    }

    Ok(())
}

pub fn prompt_password() -> Result<Zeroizing<String>> {
    print!("In [0]: ");
    io::stdout().flush()?;

    let password = Zeroizing::new(read_password().context("Failed to read password")?);
    check_password_size(&password)?;

    Ok(password)
}

/// Reads one line, keeping everything but the line terminator.
pub fn read_password_line<R: BufRead>(mut reader: R) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    reader
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    let trimmed = Zeroizing::new(line.trim_end_matches(['\r', '\n']).to_string());
    check_password_size(&trimmed)?;

    Ok(trimmed)
}

pub fn show_progress<F, T>(
    unicode_support: bool,
    message: &'static str,
    f: F,
) -> Result<(T, Duration)>
where
    F: FnOnce() -> Result<T>,
{
    // stdout carries the result and must stay free of escape codes
    let term = Term::stderr();
    let hide_cursor = term.is_term();
    if hide_cursor {
        term.hide_cursor().ok();
    }

    let pb = ProgressBar::new_spinner();

    if unicode_support {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
    } else {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("-\\|/-"),
        );
    }

    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));

    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();

    pb.finish_and_clear();
    if hide_cursor {
        term.show_cursor().ok();
    }

    result.map(|r| (r, elapsed))
}

fn strength_bar(level: StrengthLevel, options: &DisplayOptions) {
    let color = match level.feedback().0 {
        Severity::Error => "red",
        Severity::Warning => "yellow",
        Severity::Success => "green",
    };
    let template = if options.color_support {
        format!("  {{bar:25.{}}} {{msg}}", color)
    } else {
        "  {bar:25} {msg}".to_string()
    };
    let progress_chars = if options.unicode_support { "█▓░" } else { "#>-" };

    let pb = ProgressBar::with_draw_target(
        Some(StrengthLevel::steps()),
        ProgressDrawTarget::stdout(),
    );
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(progress_chars),
    );
    pb.set_message(format!("{:.0}%", level.fraction() * 100.0));
    pb.set_position(level.index() as u64 + 1);
    pb.abandon();
}

pub fn display_evaluation(
    password: &str,
    evaluation: &Evaluation,
    show_password: bool,
    options: &DisplayOptions,
) {
    let level = evaluation.level();
    let (severity, message) = level.feedback();
    let style = severity_style(severity, options);

    if show_password {
        println!("Your password is: {}", password);
    }

    if options.quiet {
        println!("{}", level.label());
        return;
    }

    println!();
    println!(
        "Password Strength: {} {}",
        style.apply_to(level.label()).bold(),
        sentiment_marker(level, options.unicode_support)
    );

    strength_bar(level, options);

    println!("{}\n", style.apply_to(message));

    display_analysis(evaluation, options);
}

fn display_analysis(evaluation: &Evaluation, options: &DisplayOptions) {
    let (met, unmet) = get_criterion_marks(options.unicode_support);
    let items = evaluation.criteria.items();

    println!("Detailed Analysis:");

    for (i, (description, passed)) in items.iter().enumerate() {
        let prefix = if i == items.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        let prefix = if options.unicode_support {
            prefix
        } else {
            "-"
        };
        let style = if !options.color_support {
            Style::new()
        } else if *passed {
            Style::new().green()
        } else {
            Style::new().red()
        };

        println!(
            "  {} {} {}",
            prefix,
            style.apply_to(if *passed { met } else { unmet }),
            description
        );
    }

    println!(
        "\nScore: {}/{}",
        evaluation.score,
        pwmeter::strength::MAX_SCORE
    );
}

pub fn display_generated(
    output: &Zeroizing<String>,
    config: &GenerationConfig,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    if options.quiet {
        println!("{}", &**output);
        return;
    }

    println!("Out[0]:\n{}\n", &**output);

    let alphabet = Alphabet::new(config);
    display_settings(config, options);
    display_stats(output, &alphabet, elapsed, options);
}

fn display_settings(config: &GenerationConfig, options: &DisplayOptions) {
    let (check_ok, _) = get_status_symbols(options.unicode_support);
    let (branch, last) = if options.unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    };

    let toggle = |enabled: bool| if enabled { check_ok } else { "-" };

    println!("Settings:");
    println!("  {} Letters    [{}] 52 chars", branch, check_ok);
    println!(
        "  {} Numbers    [{}]",
        branch,
        toggle(config.include_numbers)
    );
    println!(
        "  {} Symbols    [{}]",
        branch,
        toggle(config.include_symbols)
    );
    println!("  {} Keystream  ChaCha20 (256-bit)", branch);
    println!("  {} Sampling   Unbiased rejection", branch);
    println!(
        "  {} Output     {} {}",
        last,
        config.length,
        if config.length == 1 { "char" } else { "chars" }
    );
    println!();
}

fn display_stats(
    output: &Zeroizing<String>,
    alphabet: &Alphabet,
    elapsed: Duration,
    options: &DisplayOptions,
) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = if options.unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    };

    let length = output.chars().count();
    let entropy = alphabet.entropy_bits(length);

    let (status_icon, entropy_severity, status_text) = if entropy >= STRONG_ENTROPY {
        (check_ok, Severity::Success, "Strong")
    } else if entropy >= MIN_SAFE_ENTROPY {
        (check_ok, Severity::Warning, "Moderate")
    } else {
        (check_warn, Severity::Error, "Weak")
    };
    let entropy_style = severity_style(entropy_severity, options);

    let level = pwmeter::evaluate(output).level();
    let level_style = severity_style(level.feedback().0, options);

    println!("Stats:");
    println!(
        "  {} Entropy    {} {} bits ({})",
        branch,
        entropy_style.apply_to(format!("[{}]", status_icon)),
        entropy_style.apply_to(format!("{:.1}", entropy)),
        entropy_style.apply_to(status_text)
    );
    println!(
        "  {} Length     {} {}",
        branch,
        length,
        if length == 1 { "char" } else { "chars" }
    );
    println!("  {} Charset    {} chars", branch, alphabet.len());
    println!(
        "  {} Strength   {} {}",
        branch,
        level_style.apply_to(level.label()),
        sentiment_marker(level, options.unicode_support)
    );
    println!("  {} Time       {:.3}s", last, elapsed.as_secs_f64());
}
