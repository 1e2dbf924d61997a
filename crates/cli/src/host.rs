// Terminal host: notices go to stderr, tree refreshes are only logged since
// each invocation renders the tree afresh.

use reqbook_core::host::{Host, Notice};
use tracing::debug;

use crate::output::{self, OutputFormat};

pub struct TerminalHost {
    format: OutputFormat,
}

impl TerminalHost {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Host for TerminalHost {
    fn notify(&self, notice: Notice) {
        output::print_notice(self.format, &notice);
    }

    fn refresh_tree(&self) {
        debug!("request tree changed");
    }
}
