use anyhow::Result;

use crate::application::BackendStatus;

use super::super::Container;

pub struct StatusController<'a> {
    container: &'a Container,
}

impl<'a> StatusController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn status(&self) -> Result<String> {
        let use_case = self.container.check_backends_use_case();
        let statuses = use_case.execute().await;

        Ok(self.format_status(&statuses))
    }

    fn format_status(&self, statuses: &[BackendStatus]) -> String {
        let mut output = String::from("API Status\n==========\n");

        for status in statuses {
            output.push_str(&status.display_line());
            output.push('\n');
        }

        output.push_str(&format!(
            "\nSelected backend: {}\nConversation store: {}",
            self.container.backend(),
            self.container.store_description()
        ));
        output
    }
}
