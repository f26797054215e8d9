use log::debug;

use crate::wiki::{
    comparison_url, page_url, wiki_page_url, AliasDict, Comparison, ComparisonTool, PrefixResolver,
    WikiResult,
};

use super::commands::{CommandError, CommandResult};

const META_WIKI: &str = "https://meta.wikimedia.org/wiki/";
const XTOOLS: &str = "https://xtools.wmcloud.org/";

/// Page and comparison links about wiki editors
pub struct WikiCommands {
    resolver: PrefixResolver,
    xtools_tools: AliasDict,
    editor_interaction: ComparisonTool,
    interaction_timeline: ComparisonTool,
    command_prefix: String,
}

impl WikiCommands {
    pub fn new(resolver: PrefixResolver, command_prefix: &str) -> WikiResult<Self> {
        let xtools_tools = AliasDict::builder()
            .alias(&["editcount", "count"], "ec")
            .alias(&["articles", "created"], "pages")
            .alias(&["top"], "topedits")
            .alias(&["automated"], "autoedits")
            .alias(&["as"], "adminscore")
            .build()?;

        Ok(Self {
            resolver,
            xtools_tools,
            editor_interaction: ComparisonTool::editor_interaction(),
            interaction_timeline: ComparisonTool::interaction_timeline(),
            command_prefix: command_prefix.to_string(),
        })
    }

    /// Run the wiki command `command` (a canonical name) and return the reply
    pub fn process_command(&self, command: &str, args: &str) -> CommandResult<String> {
        if args.is_empty() {
            return Err(CommandError::UserInput(command.to_string()));
        }

        match command {
            "contribs" => self.user_page(args, "Special:Contributions/"),
            "user" => self.user_page(args, "User:"),
            "talk" => self.user_page(args, "User_talk:"),
            "logs" => self.user_page(args, "Special:Log/"),
            "page" => self.user_page(args, ""),
            "ca" => Ok(page_url(META_WIKI, "Special:CentralAuth/", args, "")),
            "xtools" => self.xtools(args),
            "eia" => self.compare(args, &self.editor_interaction, command),
            "timeline" => self.compare(args, &self.interaction_timeline, command),
            _ => Err(CommandError::NotFound(command.to_string())),
        }
    }

    fn user_page(&self, target: &str, basepage: &str) -> CommandResult<String> {
        let resolved = self.resolver.resolve(target)?;
        Ok(wiki_page_url(&resolved, basepage, ""))
    }

    fn xtools(&self, args: &str) -> CommandResult<String> {
        let (tool, target) = args
            .split_once(char::is_whitespace)
            .map(|(tool, target)| (tool, target.trim()))
            .ok_or_else(|| CommandError::UserInput("xtools".to_string()))?;

        let tool = self
            .xtools_tools
            .get(&tool.to_lowercase())
            .ok_or_else(|| CommandError::UserInput("xtools".to_string()))?;
        debug!("XTools tool '{}' for '{}'", tool, target);

        let resolved = self.resolver.resolve(target)?;
        Ok(page_url(
            &format!("{}{}/{}/", XTOOLS, tool, resolved.host()),
            "",
            &resolved.subpage,
            "",
        ))
    }

    fn compare(&self, args: &str, tool: &ComparisonTool, command: &str) -> CommandResult<String> {
        match comparison_url(args, tool, command, &self.command_prefix)? {
            Comparison::Url(url) => Ok(url),
            Comparison::BadSyntax(message) => Ok(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::{PrefixProblem, WikiError, WikiSites};

    fn commands() -> WikiCommands {
        let resolver = PrefixResolver::new(WikiSites::standard().unwrap(), "wikipedia", "en");
        WikiCommands::new(resolver, "~").unwrap()
    }

    #[test]
    fn test_user_page_links() {
        let commands = commands();

        assert_eq!(
            commands.process_command("user", "de:Example User").unwrap(),
            "<https://de.wikipedia.org/wiki/User:Example%20User>"
        );
        assert_eq!(
            commands.process_command("talk", "m:Foo").unwrap(),
            "<https://meta.wikimedia.org/wiki/User_talk:Foo>"
        );
        assert_eq!(
            commands.process_command("logs", "Foo").unwrap(),
            "<https://en.wikipedia.org/wiki/Special:Log/Foo>"
        );
        assert_eq!(
            commands.process_command("page", "wikt:fr:chat").unwrap(),
            "<https://fr.wiktionary.org/wiki/chat>"
        );
    }

    #[test]
    fn test_centralauth_ignores_prefixes() {
        assert_eq!(
            commands().process_command("ca", "fr:Foo").unwrap(),
            "<https://meta.wikimedia.org/wiki/Special:CentralAuth/fr%3AFoo>"
        );
    }

    #[test]
    fn test_xtools_tool_aliases() {
        let commands = commands();

        assert_eq!(
            commands.process_command("xtools", "editcount fr:Foo").unwrap(),
            "<https://xtools.wmcloud.org/ec/fr.wikipedia.org/Foo>"
        );
        assert_eq!(
            commands.process_command("xtools", "TOP d:Foo").unwrap(),
            "<https://xtools.wmcloud.org/topedits/www.wikidata.org/Foo>"
        );
        assert_eq!(
            commands.process_command("xtools", "pages Foo").unwrap(),
            "<https://xtools.wmcloud.org/pages/en.wikipedia.org/Foo>"
        );
    }

    #[test]
    fn test_xtools_needs_known_tool_and_user() {
        let commands = commands();

        assert!(matches!(
            commands.process_command("xtools", "bogus Foo"),
            Err(CommandError::UserInput(_))
        ));
        assert!(matches!(
            commands.process_command("xtools", "ec"),
            Err(CommandError::UserInput(_))
        ));
    }

    #[test]
    fn test_missing_target_is_user_input_error() {
        assert!(matches!(
            commands().process_command("contribs", ""),
            Err(CommandError::UserInput(_))
        ));
    }

    #[test]
    fn test_prefix_errors_propagate() {
        let err = commands().process_command("contribs", "fr:de:en:Foo").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Wiki(WikiError::InvalidPrefixCombination {
                problem: PrefixProblem::TooManyPrefixes(3),
                ..
            })
        ));
    }

    #[test]
    fn test_timeline_link() {
        assert_eq!(
            commands().process_command("timeline", "Alice|Bob#start:2021-01-01").unwrap(),
            "<https://interaction-timeline.toolforge.org/?user=Alice&user=Bob&wiki=enwiki&startDate=2021-01-01>"
        );
    }
}
