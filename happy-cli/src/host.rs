//! Console host used by `happy submit`

use happy_core::PageHost;
use tracing::info;

/// Prints notices to stdout and records where the page navigated
#[derive(Debug, Default)]
pub struct ConsoleHost {
    pub navigated_to: Option<String>,
}

impl PageHost for ConsoleHost {
    fn alert(&mut self, message: &str) {
        println!("{}", message);
    }

    fn navigate(&mut self, route: &str) {
        info!(route, "navigating");
        println!("→ {}", route);
        self.navigated_to = Some(route.to_string());
    }
}
