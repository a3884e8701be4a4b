//! Runs one notification: validate, send messages, upload files.

use std::path::Path;

use tracing::{debug, info};

use crate::client::{DeliveryClient, Transport};
use crate::composer;
use crate::config::DeliveryConfig;
use crate::context::Context;
use crate::error::{NotifyError, Result};

/// Where a run is. `Failed` can follow any other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Messaging,
    FileUploading,
    Done,
    Failed,
}

/// What a successful run delivered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub messages_sent: usize,
    pub files_sent: usize,
}

pub struct Notifier {
    context: Context,
    config: DeliveryConfig,
    stage: Stage,
}

impl Notifier {
    pub fn new(context: Context, config: DeliveryConfig) -> Self {
        Self {
            context,
            config,
            stage: Stage::Validating,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Validates the config and delivers over HTTP to the configured webhook.
    pub async fn exec(&mut self) -> Result<RunReport> {
        self.ensure_fresh()?;
        let client = match self
            .config
            .validate()
            .and_then(|url| DeliveryClient::new(url, self.config.timeout))
        {
            Ok(client) => client,
            Err(e) => return Err(self.fail(e)),
        };
        self.deliver(&client).await
    }

    /// Same as [`Notifier::exec`] but through any transport.
    pub async fn exec_with<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<RunReport> {
        self.ensure_fresh()?;
        if let Err(e) = self.config.validate() {
            return Err(self.fail(e));
        }
        self.deliver(transport).await
    }

    async fn deliver<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<RunReport> {
        let mut report = RunReport::default();

        self.advance(Stage::Messaging);
        let messages = composer::send_messages(transport, &self.context, &self.config).await;
        match messages {
            Ok(sent) => report.messages_sent = sent,
            Err(e) => return Err(self.fail(e)),
        }

        self.advance(Stage::FileUploading);
        let files = self.upload_files(transport).await;
        match files {
            Ok(sent) => report.files_sent = sent,
            Err(e) => return Err(self.fail(e)),
        }

        self.advance(Stage::Done);
        info!(
            "Notification finished: {} messages, {} files",
            report.messages_sent, report.files_sent
        );
        Ok(report)
    }

    /// Uploads files in order, skipping empty entries. Stops at the first failure.
    async fn upload_files<T: Transport + ?Sized>(&self, transport: &T) -> Result<usize> {
        let mut sent = 0;
        for file in self.config.files.iter().filter(|f| !f.is_empty()) {
            transport
                .send_file(Path::new(file), &self.config.identity)
                .await?;
            sent += 1;
        }
        Ok(sent)
    }

    fn ensure_fresh(&self) -> Result<()> {
        if self.stage != Stage::Validating {
            return Err(NotifyError::Config(format!(
                "notifier already ran (stage {:?})",
                self.stage
            )));
        }
        Ok(())
    }

    fn advance(&mut self, next: Stage) {
        debug!("{:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn fail<E: std::fmt::Display>(&mut self, err: E) -> E {
        debug!("Failed while {:?}: {}", self.stage, err);
        self.stage = Stage::Failed;
        err
    }
}
