//! Command-line and environment parsing.
//!
//! Each flag has one primary env var wired through clap. Drone, GitHub Actions
//! and plain shells use other names for the same setting, those aliases are
//! checked in order when the flag and its primary var are both absent.

use std::time::Duration;

use clap::Parser;
use drone_discord::context::{Build, CiPlatform, Commit, Repository, Source};
use drone_discord::{Context, DeliveryConfig, Identity};

/// Sending message to Discord channel using Webhook
#[derive(Parser, Debug)]
#[command(name = "drone-discord")]
#[command(version)]
#[command(about = "Sending message to Discord channel using Webhook")]
pub struct Cli {
    /// Discord webhook id
    #[arg(long, env = "PLUGIN_WEBHOOK_ID")]
    pub webhook_id: Option<String>,

    /// Discord webhook token
    #[arg(long, env = "PLUGIN_WEBHOOK_TOKEN")]
    pub webhook_token: Option<String>,

    /// Full discord webhook url, used instead of id and token
    #[arg(long, env = "PLUGIN_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Message templates (up to 2000 characters each)
    #[arg(long, env = "PLUGIN_MESSAGE", value_delimiter = ',')]
    pub message: Vec<String>,

    /// Files to upload after the messages
    #[arg(long, env = "PLUGIN_FILE", value_delimiter = ',')]
    pub file: Vec<String>,

    /// Color code of the embed, e.g. #ff00ff
    #[arg(long, env = "PLUGIN_COLOR")]
    pub color: Option<String>,

    /// Wait for server confirmation of message send
    #[arg(long, env = "PLUGIN_WAIT")]
    pub wait: bool,

    /// Send as a TTS message
    #[arg(long, env = "PLUGIN_TTS")]
    pub tts: bool,

    /// Override the default username of the webhook
    #[arg(long, env = "PLUGIN_USERNAME")]
    pub username: Option<String>,

    /// Override the default avatar of the webhook
    #[arg(long, env = "PLUGIN_AVATAR_URL")]
    pub avatar_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "PLUGIN_TIMEOUT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Environment is drone
    #[arg(long, env = "DRONE")]
    pub drone: bool,

    /// Environment is GitHub Actions
    #[arg(long, env = "PLUGIN_GITHUB")]
    pub github: bool,

    #[arg(long = "repo", env = "DRONE_REPO")]
    pub repo: Option<String>,

    #[arg(long = "repo.namespace", env = "DRONE_REPO_OWNER")]
    pub repo_namespace: Option<String>,

    #[arg(long = "repo.name", env = "DRONE_REPO_NAME", default_value = "")]
    pub repo_name: String,

    #[arg(long = "commit.sha", env = "DRONE_COMMIT_SHA")]
    pub commit_sha: Option<String>,

    #[arg(long = "commit.ref", env = "DRONE_COMMIT_REF")]
    pub commit_ref: Option<String>,

    #[arg(long = "commit.branch", env = "DRONE_COMMIT_BRANCH", default_value = "master")]
    pub commit_branch: String,

    #[arg(long = "commit.link", env = "DRONE_COMMIT_LINK", default_value = "")]
    pub commit_link: String,

    #[arg(long = "commit.author", env = "DRONE_COMMIT_AUTHOR", default_value = "")]
    pub commit_author: String,

    #[arg(long = "commit.author.email", env = "DRONE_COMMIT_AUTHOR_EMAIL", default_value = "")]
    pub commit_email: String,

    #[arg(long = "commit.author.avatar", env = "DRONE_COMMIT_AUTHOR_AVATAR", default_value = "")]
    pub commit_avatar: String,

    #[arg(long = "commit.message", env = "DRONE_COMMIT_MESSAGE", default_value = "")]
    pub commit_message: String,

    #[arg(long = "source.branch", env = "DRONE_SOURCE_BRANCH", default_value = "")]
    pub source_branch: String,

    #[arg(long = "build.event", env = "DRONE_BUILD_EVENT", default_value = "push")]
    pub build_event: String,

    #[arg(long = "build.number", env = "DRONE_BUILD_NUMBER", default_value_t = 0)]
    pub build_number: u64,

    #[arg(long = "build.status", env = "DRONE_BUILD_STATUS", default_value = "success")]
    pub build_status: String,

    #[arg(long = "build.link", env = "DRONE_BUILD_LINK", default_value = "")]
    pub build_link: String,

    #[arg(long = "build.tag", env = "DRONE_TAG", default_value = "")]
    pub build_tag: String,

    #[arg(long = "build.started", env = "DRONE_BUILD_STARTED", default_value_t = 0)]
    pub build_started: i64,

    #[arg(long = "build.finished", env = "DRONE_BUILD_FINISHED", default_value_t = 0)]
    pub build_finished: i64,

    #[arg(long = "pull.request", env = "DRONE_PULL_REQUEST", default_value = "")]
    pub pull_request: String,

    /// Target environment of promotion and rollback pipelines
    #[arg(long = "deploy.to", env = "DRONE_DEPLOY_TO", default_value = "")]
    pub deploy_to: String,

    #[arg(long = "github.workflow", env = "GITHUB_WORKFLOW", default_value = "")]
    pub github_workflow: String,

    #[arg(long = "github.action", env = "GITHUB_ACTION", default_value = "")]
    pub github_action: String,

    #[arg(long = "github.event.name", env = "GITHUB_EVENT_NAME", default_value = "")]
    pub github_event_name: String,

    #[arg(long = "github.event.path", env = "GITHUB_EVENT_PATH", default_value = "")]
    pub github_event_path: String,

    #[arg(long = "github.workspace", env = "GITHUB_WORKSPACE", default_value = "")]
    pub github_workspace: String,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Splits the parsed arguments into the build context and delivery config.
    pub fn into_parts(self) -> (Context, DeliveryConfig) {
        self.into_parts_with(|name| std::env::var(name).ok())
    }

    /// Like [`Cli::into_parts`], resolving alias env vars through `lookup`.
    pub fn into_parts_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> (Context, DeliveryConfig) {
        let env = Env(lookup);
        let context = Context {
            repo: Repository {
                full_name: env.or(self.repo, &["GITHUB_REPOSITORY"]),
                namespace: env.or(
                    self.repo_namespace,
                    &["DRONE_REPO_NAMESPACE", "GITHUB_ACTOR"],
                ),
                name: self.repo_name,
            },
            commit: Commit {
                sha: env.or(self.commit_sha, &["GITHUB_SHA"]),
                git_ref: env.or(self.commit_ref, &["GITHUB_REF"]),
                branch: self.commit_branch,
                link: self.commit_link,
                author: self.commit_author,
                email: self.commit_email,
                avatar: self.commit_avatar,
                message: self.commit_message,
            },
            source: Source {
                branch: self.source_branch,
            },
            build: Build {
                tag: self.build_tag,
                event: self.build_event,
                number: self.build_number,
                status: self.build_status,
                link: self.build_link,
                started: self.build_started,
                finished: self.build_finished,
                pull_request: self.pull_request,
                deploy_to: self.deploy_to,
            },
            platform: CiPlatform {
                drone: self.drone,
                github: env.flag_or(self.github, "PLUGIN_GITHUB", &["GITHUB"]),
                workflow: self.github_workflow,
                workspace: self.github_workspace,
                action: self.github_action,
                event_name: self.github_event_name,
                event_path: self.github_event_path,
            },
        };

        let config = DeliveryConfig {
            webhook_url: env.or(
                self.webhook_url,
                &["WEBHOOK_URL", "DISCORD_WEBHOOK_URL", "INPUT_WEBHOOK_URL"],
            ),
            webhook_id: env.or(
                self.webhook_id,
                &["WEBHOOK_ID", "DISCORD_WEBHOOK_ID", "INPUT_WEBHOOK_ID"],
            ),
            webhook_token: env.or(
                self.webhook_token,
                &["WEBHOOK_TOKEN", "DISCORD_WEBHOOK_TOKEN", "INPUT_WEBHOOK_TOKEN"],
            ),
            color: env.or(self.color, &["COLOR", "INPUT_COLOR"]),
            messages: env.list_or(self.message, &["DISCORD_MESSAGE", "MESSAGE", "INPUT_MESSAGE"]),
            files: env.list_or(self.file, &["DISCORD_FILE", "FILE", "INPUT_FILE"]),
            identity: Identity {
                username: env.or(self.username, &["USERNAME", "INPUT_USERNAME"]),
                avatar_url: env.or(self.avatar_url, &["AVATAR_URL", "INPUT_AVATAR_URL"]),
                tts: env.flag_or(self.tts, "PLUGIN_TTS", &["TTS", "INPUT_TTS"]),
                wait: env.flag_or(self.wait, "PLUGIN_WAIT", &["WAIT", "INPUT_WAIT"]),
            },
            timeout: Duration::from_secs(self.timeout),
        };

        (context, config)
    }
}

/// Env var lookup, `std::env::var` outside of tests.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// First non-empty value among `names`, checked in order.
    fn first(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .filter_map(|name| (self.0)(name))
            .find(|value| !value.is_empty())
    }

    fn or(&self, value: Option<String>, aliases: &[&str]) -> String {
        value
            .filter(|v| !v.is_empty())
            .or_else(|| self.first(aliases))
            .unwrap_or_default()
    }

    fn list_or(&self, values: Vec<String>, aliases: &[&str]) -> Vec<String> {
        if !values.is_empty() {
            return values;
        }
        self.first(aliases)
            .map(|raw| split_list(&raw))
            .unwrap_or_default()
    }

    /// `flag` already reflects the command line and `primary`. Aliases only
    /// count when `primary` is not set at all, so `PLUGIN_WAIT=false` wins
    /// over `WAIT=true`.
    fn flag_or(&self, flag: bool, primary: &str, aliases: &[&str]) -> bool {
        if flag || self.first(&[primary]).is_some() {
            return flag;
        }
        self.first(aliases).is_some_and(|raw| parse_flag(&raw))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::collections::HashMap;

    fn fake_env(vars: &[(&str, &str)]) -> Env<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Env(move |name: &str| map.get(name).cloned())
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["drone-discord", "--timeout", "0"]).is_err());
        let cli = Cli::try_parse_from(["drone-discord", "--timeout", "15"]).unwrap();
        assert_eq!(cli.timeout, 15);
    }

    #[test]
    fn list_splitting_keeps_empty_entries() {
        assert_eq!(split_list("a.txt,,b.txt"), vec!["a.txt", "", "b.txt"]);
        assert_eq!(split_list("one"), vec!["one"]);
    }

    #[test]
    fn flag_parsing() {
        for raw in ["true", "TRUE", "1", " yes ", "on"] {
            assert!(parse_flag(raw), "{}", raw);
        }
        for raw in ["false", "0", "", "nope"] {
            assert!(!parse_flag(raw), "{}", raw);
        }
    }

    #[test]
    fn explicit_value_beats_aliases() {
        let env = fake_env(&[("WEBHOOK_ID", "from-env")]);
        assert_eq!(env.or(Some("given".to_string()), &["WEBHOOK_ID"]), "given");
        assert_eq!(env.or(Some(String::new()), &["WEBHOOK_ID"]), "from-env");
        assert_eq!(env.or(None, &["UNSET"]), "");
    }

    #[test]
    fn first_alias_in_order_wins() {
        let env = fake_env(&[
            ("DISCORD_WEBHOOK_ID", "second"),
            ("WEBHOOK_ID", "first"),
            ("INPUT_WEBHOOK_ID", "third"),
        ]);
        assert_eq!(
            env.or(None, &["WEBHOOK_ID", "DISCORD_WEBHOOK_ID", "INPUT_WEBHOOK_ID"]),
            "first"
        );
    }

    #[test]
    fn empty_aliases_are_skipped() {
        let env = fake_env(&[("WEBHOOK_ID", ""), ("DISCORD_WEBHOOK_ID", "second")]);
        assert_eq!(
            env.or(None, &["WEBHOOK_ID", "DISCORD_WEBHOOK_ID", "INPUT_WEBHOOK_ID"]),
            "second"
        );
    }

    #[test]
    fn list_aliases_split_on_commas() {
        let env = fake_env(&[("MESSAGE", "build {{ build.number }},done"), ("INPUT_MESSAGE", "x")]);
        assert_eq!(
            env.list_or(Vec::new(), &["DISCORD_MESSAGE", "MESSAGE", "INPUT_MESSAGE"]),
            vec!["build {{ build.number }}", "done"]
        );
        assert_eq!(
            env.list_or(vec!["cli".to_string()], &["MESSAGE"]),
            vec!["cli"]
        );
    }

    #[test]
    fn primary_flag_var_shadows_aliases() {
        let env = fake_env(&[("PLUGIN_WAIT", "false"), ("WAIT", "true")]);
        assert!(!env.flag_or(false, "PLUGIN_WAIT", &["WAIT", "INPUT_WAIT"]));

        let env = fake_env(&[("WAIT", "false"), ("INPUT_WAIT", "true")]);
        assert!(!env.flag_or(false, "PLUGIN_WAIT", &["WAIT", "INPUT_WAIT"]));

        let env = fake_env(&[("INPUT_WAIT", "true")]);
        assert!(env.flag_or(false, "PLUGIN_WAIT", &["WAIT", "INPUT_WAIT"]));
        assert!(env.flag_or(true, "PLUGIN_WAIT", &["WAIT"]));
    }

    #[test]
    fn into_parts_resolves_aliases() {
        let cli = Cli::try_parse_from([
            "drone-discord",
            "--webhook-id",
            "123",
            "--webhook-token",
            "",
            "--repo",
            "",
            "--build.event",
            "tag",
        ])
        .unwrap();
        let vars: HashMap<&str, &str> = [
            ("WEBHOOK_TOKEN", "token"),
            ("INPUT_MESSAGE", "a,b"),
            ("GITHUB_REPOSITORY", "octocat/hello-world"),
            ("TTS", "true"),
        ]
        .into_iter()
        .collect();

        let (context, config) = cli.into_parts_with(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.webhook_id, "123");
        assert_eq!(config.webhook_token, "token");
        assert_eq!(config.messages, vec!["a", "b"]);
        assert!(config.identity.tts);
        assert_eq!(context.repo.full_name, "octocat/hello-world");
        assert_eq!(context.build.event, "tag");
    }
}
