use log::{debug, error, info};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::BotConfiguration;
use crate::types::{BotAction, BotCommand, ChatMessage};
use crate::wiki::{PrefixResolver, WikiError, WikiResult};

use super::role_commands::RoleCommands;
use super::wiki_commands::WikiCommands;

/// Every command the bot answers to
pub const COMMANDS: &[BotCommand] = &[
    BotCommand {
        name: "contribs",
        aliases: &["contributions"],
        usage: "[lang:][family:]<user>",
        description: "Link to a user's contributions",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "user",
        aliases: &["userpage"],
        usage: "[lang:][family:]<user>",
        description: "Link to a user page",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "talk",
        aliases: &["usertalk"],
        usage: "[lang:][family:]<user>",
        description: "Link to a user talk page",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "logs",
        aliases: &["log"],
        usage: "[lang:][family:]<user>",
        description: "Link to a user's logs",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "page",
        aliases: &["link"],
        usage: "[lang:][family:]<page>",
        description: "Link to any wiki page",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "ca",
        aliases: &["centralauth"],
        usage: "<user>",
        description: "Link to a user's global account information",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "xtools",
        aliases: &["xt"],
        usage: "<ec|pages|topedits|autoedits|adminscore> [lang:][family:]<user>",
        description: "Link to XTools statistics for a user",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "eia",
        aliases: &["interaction"],
        usage: "<user1>|<user2>[|...][#server:<dbname>][#start:<date>][#end:<date>][#ns:<n>]",
        description: "Compare users with the Editor Interaction Analyser",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "timeline",
        aliases: &["tl"],
        usage: "<user1>|<user2>[#wiki:<dbname>][#start:<date>][#end:<date>]",
        description: "Compare users with the Interaction Timeline",
        mod_only: false,
        hidden: false,
    },
    BotCommand {
        name: "role",
        aliases: &[],
        usage: "<give|take> <role> <member>",
        description: "Change roles for a member",
        mod_only: true,
        hidden: false,
    },
    BotCommand {
        name: "version",
        aliases: &[],
        usage: "",
        description: "Show the bot's current version",
        mod_only: false,
        hidden: true,
    },
    BotCommand {
        name: "help",
        aliases: &[],
        usage: "[command]",
        description: "List commands or explain one",
        mod_only: false,
        hidden: false,
    },
];

/// Reply for failures the user cannot fix
pub const UNKNOWN_ERROR: &str = "Unknown error.";

/// Ways a command can fail; each becomes a reply in [`CommandSystem::error_reply`]
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid arguments for '{0}'")]
    UserInput(String),

    #[error("unknown command '{0}'")]
    NotFound(String),

    #[error("missing moderator role for '{0}'")]
    MissingRole(String),

    #[error(transparent)]
    Wiki(#[from] WikiError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

pub struct CommandSystem {
    command_prefix: String,
    bot_name: String,
    version_name: String,
    bot_user_id: Option<String>,
    mod_role: Option<String>,
    wiki_commands: WikiCommands,
    role_commands: RoleCommands,
}

/// Split `~name args` into the lowercased command name and its arguments
pub fn parse_command<'a>(content: &'a str, prefix: &str) -> Option<(String, &'a str)> {
    let rest = content.strip_prefix(prefix)?;
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    if name_end == 0 {
        return None;
    }

    let (name, args) = rest.split_at(name_end);
    Some((name.to_lowercase(), args.trim()))
}

pub fn find_command(name: &str) -> Option<&'static BotCommand> {
    COMMANDS.iter().find(|command| command.matches(name))
}

impl CommandSystem {
    pub fn new(config: &BotConfiguration, resolver: PrefixResolver) -> WikiResult<Self> {
        let command_prefix = config.core.command_prefix.clone();
        info!("Command prefix set to: {}", command_prefix);

        Ok(Self {
            wiki_commands: WikiCommands::new(resolver, &command_prefix)?,
            role_commands: RoleCommands::new(),
            command_prefix,
            bot_name: config.core.bot_name.clone(),
            version_name: config.core.version_name.clone(),
            bot_user_id: config.server.bot_user_id.clone(),
            mod_role: config.server.mod_role.clone(),
        })
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Whether the bot should look at `message` at all
    pub fn should_ignore(&self, message: &ChatMessage) -> bool {
        message.is_webhook || self.bot_user_id.as_deref() == Some(message.author_id.as_str())
    }

    /// Process a single message and run the command it contains, if any
    pub async fn process_message(&self, message: &ChatMessage, action_tx: &mpsc::Sender<BotAction>) {
        if self.should_ignore(message) {
            return;
        }

        if message.is_direct() {
            debug!("Direct message from '{}'", message.username);
            send(action_tx, BotAction::reply(message, "Not yet implemented, sorry...")).await;
            return;
        }

        let (command_name, args) = match parse_command(&message.content, &self.command_prefix) {
            Some(parsed) => parsed,
            None => return,
        };

        debug!(
            "Processing command '{}' from user '{}' in #{}",
            command_name, message.username, message.channel
        );

        let canonical = find_command(&command_name).map(|c| c.name).unwrap_or(command_name.as_str());
        match self.execute(&command_name, args, message) {
            Ok(actions) => {
                info!(
                    "Executed command '{}' for user '{}' in #{}",
                    canonical, message.username, message.channel
                );
                for action in actions {
                    send(action_tx, action).await;
                }
            }
            Err(e) => {
                // `~~strikethrough~~` is markup, not a mistyped command
                let doubled = format!("{0}{0}", self.command_prefix);
                if message.content.starts_with(&doubled) {
                    return;
                }
                debug!("Command '{}' failed: {}", canonical, e);
                send(action_tx, BotAction::reply(message, self.error_reply(&e, canonical))).await;
            }
        }
    }

    fn execute(&self, name: &str, args: &str, message: &ChatMessage) -> CommandResult<Vec<BotAction>> {
        let command = find_command(name).ok_or_else(|| CommandError::NotFound(name.to_string()))?;

        if command.mod_only && !self.is_moderator(message) {
            return Err(CommandError::MissingRole(command.name.to_string()));
        }

        match command.name {
            "help" => Ok(vec![BotAction::reply(message, self.help(args)?)]),
            "version" => Ok(vec![BotAction::reply(message, self.version())]),
            "role" => self.role_commands.process_command(args, message),
            name => {
                let text = self.wiki_commands.process_command(name, args)?;
                Ok(vec![BotAction::reply(message, text)])
            }
        }
    }

    fn is_moderator(&self, message: &ChatMessage) -> bool {
        match &self.mod_role {
            Some(role) => message.has_role(role),
            None => false,
        }
    }

    /// The reply sent when a command fails
    pub fn error_reply(&self, error: &CommandError, command: &str) -> String {
        match error {
            CommandError::UserInput(_) | CommandError::Wiki(_) => format!(
                "*You need to use the correct syntax...* Type `{}help {}` for more information.",
                self.command_prefix, command
            ),
            CommandError::NotFound(_) => format!(
                "*You need to use a valid command...* Type `{}help` for a list of commands.",
                self.command_prefix
            ),
            CommandError::MissingRole(_) => {
                "You don't appear to have the correct role for this command.".to_string()
            }
            CommandError::Internal(e) => {
                error!("Command '{}' failed: {:#}", command, e);
                UNKNOWN_ERROR.to_string()
            }
        }
    }

    fn version(&self) -> String {
        format!("{} v{} (codename {})", self.bot_name, crate::VERSION, self.version_name)
    }

    fn help(&self, args: &str) -> CommandResult<String> {
        let prefix = &self.command_prefix;

        if args.is_empty() {
            let lines: Vec<String> = COMMANDS
                .iter()
                .filter(|command| !command.hidden)
                .map(|command| format!("`{}{}` - {}", prefix, command.name, command.description))
                .collect();
            return Ok(format!("Commands:\n{}", lines.join("\n")));
        }

        let name = args.trim_start_matches(prefix.as_str()).to_lowercase();
        let command = find_command(&name).ok_or(CommandError::NotFound(name))?;

        let mut text = format!("`{}{} {}`\n{}", prefix, command.name, command.usage, command.description);
        if !command.aliases.is_empty() {
            let aliases: Vec<String> = command.aliases.iter().map(|a| format!("`{}{}`", prefix, a)).collect();
            text.push_str(&format!("\nAliases: {}", aliases.join(", ")));
        }
        if command.mod_only {
            text.push_str("\nModerators only.");
        }
        Ok(text)
    }
}

async fn send(action_tx: &mpsc::Sender<BotAction>, action: BotAction) {
    if let Err(e) = action_tx.send(action).await {
        error!("Failed to queue bot action: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_message;
    use crate::wiki::WikiSites;

    fn system() -> CommandSystem {
        let mut config = BotConfiguration::default();
        config.server.mod_role = Some("mods".to_string());
        config.server.bot_user_id = Some("1".to_string());

        let resolver = PrefixResolver::new(WikiSites::standard().unwrap(), "wikipedia", "en");
        CommandSystem::new(&config, resolver).unwrap()
    }

    async fn run(message: ChatMessage) -> Vec<BotAction> {
        let (tx, mut rx) = mpsc::channel(10);
        system().process_message(&message, &tx).await;
        drop(tx);

        let mut actions = Vec::new();
        while let Some(action) = rx.recv().await {
            actions.push(action);
        }
        actions
    }

    fn said(actions: &[BotAction]) -> Vec<&str> {
        actions
            .iter()
            .filter_map(|action| match action {
                BotAction::Say { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("~contribs Foo Bar", "~"), Some(("contribs".to_string(), "Foo Bar")));
        assert_eq!(parse_command("~Version", "~"), Some(("version".to_string(), "")));
        assert_eq!(parse_command("~eia\nA|B ", "~"), Some(("eia".to_string(), "A|B")));
        assert_eq!(parse_command("~ contribs", "~"), None);
        assert_eq!(parse_command("~", "~"), None);
        assert_eq!(parse_command("hello", "~"), None);
    }

    #[tokio::test]
    async fn test_page_command_replies_with_link() {
        let actions = run(test_message("~contribs fr:s:Example")).await;
        assert_eq!(
            said(&actions),
            vec!["<https://fr.wikisource.org/wiki/Special:Contributions/Example>"]
        );
    }

    #[tokio::test]
    async fn test_command_names_are_case_insensitive() {
        let actions = run(test_message("~CONTRIBUTIONS Foo")).await;
        assert_eq!(
            said(&actions),
            vec!["<https://en.wikipedia.org/wiki/Special:Contributions/Foo>"]
        );
    }

    #[tokio::test]
    async fn test_invalid_prefixes_reply_with_syntax_help() {
        let actions = run(test_message("~contributions d:fr:User")).await;
        assert_eq!(
            said(&actions),
            vec!["*You need to use the correct syntax...* Type `~help contribs` for more information."]
        );
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let actions = run(test_message("~frobnicate")).await;
        assert_eq!(
            said(&actions),
            vec!["*You need to use a valid command...* Type `~help` for a list of commands."]
        );
    }

    #[tokio::test]
    async fn test_strikethrough_is_ignored() {
        let actions = run(test_message("~~not a command~~")).await;
        assert!(actions.is_empty());
    }

    #[tokio::test]
    async fn test_role_requires_moderator() {
        let actions = run(test_message("~role give editors bob")).await;
        assert_eq!(
            said(&actions),
            vec!["You don't appear to have the correct role for this command."]
        );
    }

    #[tokio::test]
    async fn test_moderator_can_give_role() {
        let mut message = test_message("~role give editors bob");
        message.roles.push("mods".to_string());

        let actions = run(message).await;
        assert_eq!(
            actions,
            vec![BotAction::AddRole {
                platform: "console".to_string(),
                guild: "guild".to_string(),
                member: "bob".to_string(),
                role: "editors".to_string(),
                channel: "general".to_string(),
                confirmation: "Giving editors role to bob".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_direct_message_is_not_processed() {
        let mut message = test_message("~contribs Foo");
        message.guild = None;

        let actions = run(message).await;
        assert_eq!(said(&actions), vec!["Not yet implemented, sorry..."]);
    }

    #[tokio::test]
    async fn test_own_and_webhook_messages_are_ignored() {
        let mut own = test_message("~version");
        own.author_id = "1".to_string();
        assert!(run(own).await.is_empty());

        let mut webhook = test_message("~version");
        webhook.is_webhook = true;
        assert!(run(webhook).await.is_empty());
    }

    #[tokio::test]
    async fn test_comparison_bad_flags_are_relayed() {
        let actions = run(test_message("~eia A|B#colour:blue")).await;
        assert_eq!(
            said(&actions),
            vec!["`~eia` does not accept the following parameter: `colour`. For more information, type `~help eia`."]
        );
    }

    #[tokio::test]
    async fn test_comparison_needs_two_users() {
        let actions = run(test_message("~timeline Alice")).await;
        assert_eq!(
            said(&actions),
            vec!["*You need to use the correct syntax...* Type `~help timeline` for more information."]
        );
    }

    #[tokio::test]
    async fn test_version() {
        let actions = run(test_message("~version")).await;
        assert_eq!(
            said(&actions),
            vec![format!("TheresNoBot v{} (codename ArbCom)", crate::VERSION).as_str()]
        );
    }

    #[tokio::test]
    async fn test_help_for_one_command() {
        let actions = run(test_message("~help ~CA")).await;
        assert_eq!(
            said(&actions),
            vec!["`~ca <user>`\nLink to a user's global account information\nAliases: `~centralauth`"]
        );
    }

    #[tokio::test]
    async fn test_help_lists_visible_commands() {
        let actions = run(test_message("~help")).await;
        let text = said(&actions)[0];
        assert!(text.contains("`~contribs` - "));
        assert!(!text.contains("`~version`"));
    }
}
