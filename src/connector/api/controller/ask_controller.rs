use anyhow::Result;

use super::super::Container;
use super::turn::submit_bounded;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, prompt: String) -> Result<String> {
        let mut session = self.container.chat_session();
        let reply = submit_bounded(&mut session, &prompt, self.container.timeout(), true).await?;
        Ok(reply.text().to_string())
    }
}
