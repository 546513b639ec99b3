#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .trim()
            .split(' ')
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        let prefix = args[0].to_string();
        args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_attach()
            || cmd.is_upload()
            || cmd.is_select_chat()
            || cmd.is_language()
            || cmd.is_expand()
            || cmd.is_refresh()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_attach(&self) -> bool {
        return ["/at", "/attach"].contains(&self.command.as_str());
    }

    pub fn is_upload(&self) -> bool {
        return ["/u", "/upload"].contains(&self.command.as_str());
    }

    pub fn is_select_chat(&self) -> bool {
        return ["/ch", "/chat"].contains(&self.command.as_str());
    }

    pub fn is_language(&self) -> bool {
        return ["/l", "/lang", "/language"].contains(&self.command.as_str());
    }

    pub fn is_expand(&self) -> bool {
        return ["/x", "/expand"].contains(&self.command.as_str());
    }

    pub fn is_refresh(&self) -> bool {
        return ["/rf", "/refresh"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}
