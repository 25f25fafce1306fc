//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::{Settings, REQUIRED_VARS};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Morning Buddy Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Keys").bold());
    for name in REQUIRED_VARS {
        let check = check_api_key(name, std::env::var(name).ok().as_deref());
        check.print();
        checks.push(check);
    }

    println!();

    println!("{}", style("Endpoints").bold());
    Output::kv("Model", &format!("{} ({})", settings.model.model, settings.model.api_base));
    Output::kv("Forecast model", &settings.model.forecast_model);
    if settings.model.forecast_search {
        Output::kv("Forecast search", &settings.model.search_api_base);
    } else {
        Output::kv("Forecast search", "disabled");
    }
    Output::kv("Weather", &settings.providers.weather_url);
    Output::kv("News", &settings.providers.news_url);
    Output::kv("Events", &settings.providers.events_url);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    if let Some(dir) = &settings.prompts.custom_dir {
        let prompt_check = check_prompt_dir(dir);
        prompt_check.print();
        checks.push(prompt_check);
    }

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. The server will not start until they are fixed.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Morning Buddy is ready to serve.");
    }

    Ok(())
}

/// Check that an API key variable is set, showing only a masked form.
fn check_api_key(name: &str, value: Option<&str>) -> CheckResult {
    let hint = format!("Set it in .env or with: export {}='...'", name);
    match value.map(str::trim) {
        Some(key) if key.is_empty() => CheckResult::error(name, "empty", &hint),
        Some(key) if key.chars().count() > 8 => {
            let chars: Vec<char> = key.chars().collect();
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 2..].iter().collect();
            CheckResult::ok(name, &format!("configured ({}...{})", head, tail))
        }
        Some(_) => CheckResult::warning(name, "set but looks too short", &hint),
        None => CheckResult::error(name, "not set", &hint),
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create one at {}", config_path.display()),
        )
    }
}

/// Check that a custom prompt directory exists.
fn check_prompt_dir(dir: &str) -> CheckResult {
    let path = Settings::expand_path(dir);
    if path.is_dir() {
        CheckResult::ok("Custom prompts", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Custom prompts",
            &format!("{} not found, using defaults", path.display()),
            "Add weather.toml, news.toml or planner.toml to override prompts",
        )
    }
}
