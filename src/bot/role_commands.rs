use log::info;

use crate::types::{BotAction, ChatMessage};

use super::commands::{CommandError, CommandResult};

/// `role give|take <role> <member>`
#[derive(Default)]
pub struct RoleCommands;

impl RoleCommands {
    pub fn new() -> Self {
        Self
    }

    /// The member name is everything after the role and may contain spaces
    pub fn process_command(&self, args: &str, message: &ChatMessage) -> CommandResult<Vec<BotAction>> {
        let (action, role, member) =
            split_role_args(args).ok_or_else(|| CommandError::UserInput("role".to_string()))?;

        let guild = message
            .guild
            .clone()
            .ok_or_else(|| CommandError::UserInput("role".to_string()))?;

        match action {
            "give" => {
                info!("{} gives role '{}' to '{}'", message.username, role, member);
                Ok(vec![BotAction::AddRole {
                    platform: message.platform.clone(),
                    guild,
                    member: member.to_string(),
                    role: role.to_string(),
                    channel: message.channel.clone(),
                    confirmation: format!("Giving {} role to {}", role, member),
                }])
            }
            "take" => {
                info!("{} takes role '{}' from '{}'", message.username, role, member);
                Ok(vec![BotAction::RemoveRole {
                    platform: message.platform.clone(),
                    guild,
                    member: member.to_string(),
                    role: role.to_string(),
                    channel: message.channel.clone(),
                    confirmation: format!("Removing {} role from {}", role, member),
                }])
            }
            other => Ok(vec![BotAction::reply(
                message,
                format!("Invalid role action {}", other),
            )]),
        }
    }
}

fn split_role_args(args: &str) -> Option<(&str, &str, &str)> {
    let (action, rest) = args.trim().split_once(char::is_whitespace)?;
    let (role, member) = rest.trim_start().split_once(char::is_whitespace)?;
    let member = member.trim();
    if member.is_empty() {
        return None;
    }
    Some((action, role, member))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_message;

    #[test]
    fn test_take_role() {
        let message = test_message("~role take editors bob smith");
        let actions = RoleCommands::new()
            .process_command("take editors bob smith", &message)
            .unwrap();

        assert_eq!(
            actions,
            vec![BotAction::RemoveRole {
                platform: "console".to_string(),
                guild: "guild".to_string(),
                member: "bob smith".to_string(),
                role: "editors".to_string(),
                channel: "general".to_string(),
                confirmation: "Removing editors role from bob smith".to_string(),
            }]
        );
    }

    #[test]
    fn test_extra_spaces_between_arguments() {
        let message = test_message("~role give  editors   bob");
        let actions = RoleCommands::new()
            .process_command("give  editors   bob", &message)
            .unwrap();

        assert!(matches!(
            &actions[..],
            [BotAction::AddRole { role, member, confirmation, .. }]
                if role == "editors" && member == "bob" && confirmation == "Giving editors role to bob"
        ));
    }

    #[test]
    fn test_unknown_action_is_reported() {
        let message = test_message("~role swap editors bob");
        let actions = RoleCommands::new().process_command("swap editors bob", &message).unwrap();

        assert_eq!(actions, vec![BotAction::reply(&message, "Invalid role action swap")]);
    }

    #[test]
    fn test_missing_arguments() {
        let message = test_message("~role give editors");
        assert!(matches!(
            RoleCommands::new().process_command("give editors", &message),
            Err(CommandError::UserInput(_))
        ));
        assert!(matches!(
            RoleCommands::new().process_command("give editors   ", &message),
            Err(CommandError::UserInput(_))
        ));
    }
}
