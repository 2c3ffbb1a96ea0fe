//! Command-line options layered over the environment settings
use clap::Parser;

use refine_core::Settings;

#[derive(Parser, Debug, Default)]
#[command(name = "backlog-refine", version, about = "Flag backlog tickets that need refinement")]
pub struct Cli {
    /// Read tickets from Jira, whatever USE_JIRA says.
    #[arg(long, conflicts_with = "file")]
    pub jira: bool,

    /// Read tickets from this CSV file instead of Jira.
    #[arg(long, value_name = "PATH")]
    pub file: Option<String>,

    /// Jira project to search.
    #[arg(long, value_name = "KEY")]
    pub project_key: Option<String>,

    /// Maximum number of tickets fetched from Jira.
    #[arg(long, value_name = "N")]
    pub max_results: Option<u32>,

    /// YAML templates file for the chat messages and the comment lead-in.
    #[arg(long, value_name = "PATH")]
    pub templates: Option<String>,

    /// Print comments and the chat message instead of posting them.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Apply the overrides on top of `settings`
    pub fn apply(&self, settings: &mut Settings) {
        if self.jira {
            settings.jira.use_jira = true;
        }
        if let Some(file) = &self.file {
            settings.jira.use_jira = false;
            settings.jira.local_file = file.clone();
        }
        if let Some(key) = &self.project_key {
            settings.jira.project_key = key.clone();
        }
        if let Some(max) = self.max_results {
            settings.jira.max_results = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::from_lookup(|key| match key {
            "USE_JIRA" => Some("1".to_string()),
            "JIRA_PROJECT_KEY" => Some("DEV".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_file_switches_to_file_mode() {
        let cli = Cli::parse_from(["backlog-refine", "--file", "stories.csv", "--dry-run"]);
        let mut settings = settings();
        cli.apply(&mut settings);

        assert!(cli.dry_run);
        assert!(!settings.jira.use_jira);
        assert_eq!(settings.jira.local_file, "stories.csv");
        assert_eq!(settings.jira.project_key, "DEV");
    }

    #[test]
    fn test_tracker_overrides() {
        let cli = Cli::parse_from(["backlog-refine", "--jira", "--project-key", "OPS", "--max-results", "10"]);
        let mut settings = settings();
        settings.jira.use_jira = false;
        cli.apply(&mut settings);

        assert!(settings.jira.use_jira);
        assert_eq!(settings.jira.project_key, "OPS");
        assert_eq!(settings.jira.max_results, 10);
    }

    #[test]
    fn test_jira_and_file_conflict() {
        assert!(Cli::try_parse_from(["backlog-refine", "--jira", "--file", "x.csv"]).is_err());
    }

    #[test]
    fn test_no_flags_leave_settings_alone() {
        let cli = Cli::parse_from(["backlog-refine"]);
        let mut settings = settings();
        cli.apply(&mut settings);

        assert!(settings.jira.use_jira);
        assert_eq!(settings.jira.max_results, 50);
    }
}
