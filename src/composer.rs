//! Turns the configured messages into webhook payloads and sends them

use tracing::{debug, info};

use crate::client::Transport;
use crate::color::resolve_color;
use crate::config::DeliveryConfig;
use crate::context::Context;
use crate::error::Result;
use crate::payload::{Embed, EmbedAuthor, EmbedFooter, Payload};
use crate::template;

/// Footer icon for generated embeds
pub const DRONE_ICON_URL: &str = "https://c1.staticflickr.com/5/4236/34957940160_435d83114f_z.jpg";
/// Footer text for generated embeds
pub const DRONE_DESC: &str = "Powered by Drone Discord Plugin";

/// Sends every configured message, in order, and returns how many requests
/// were made.
///
/// Without messages a single default embed is sent. With a color override all
/// rendered messages are batched as embeds into one request; otherwise each
/// one goes out as its own plain-text message. The first failure stops the
/// loop; anything already sent stays sent.
pub async fn send_messages<T: Transport + ?Sized>(
    transport: &T,
    context: &Context,
    config: &DeliveryConfig,
) -> Result<usize> {
    if config.messages.is_empty() {
        debug!("No messages configured, sending default embed");
        let payload =
            Payload::new(&config.identity).with_embeds(vec![default_embed(context, &config.color)]);
        transport.send_message(&payload).await?;
        return Ok(1);
    }

    let mut sent = 0;
    let mut embeds = Vec::new();
    for message in config.messages.iter().filter(|m| !m.trim().is_empty()) {
        let text = template::render(message, context)?;

        if config.has_color_override() {
            embeds.push(title_embed(text, context, &config.color));
        } else {
            // A fresh payload per send, nothing carries over from the last one.
            let payload = Payload::new(&config.identity).with_content(text);
            transport.send_message(&payload).await?;
            sent += 1;
        }
    }

    if !embeds.is_empty() {
        info!("Sending {} embeds in one message", embeds.len());
        let payload = Payload::new(&config.identity).with_embeds(embeds);
        transport.send_message(&payload).await?;
        sent += 1;
    }

    Ok(sent)
}

/// The card sent when no message templates are configured.
pub fn default_embed(context: &Context, color_override: &str) -> Embed {
    let commit = &context.commit;

    let description = if context.platform.github {
        format!(
            "{}/{} triggered by {} ({})",
            context.repo.full_name,
            context.platform.workflow,
            context.repo.namespace,
            context.platform.event_name
        )
    } else {
        match context.build.event.as_str() {
            "push" => format!("{} pushed to {}", commit.author, commit.branch),
            "pull_request" => format!(
                "{} updated pull request {}",
                commit.author,
                commit.ref_or_branch()
            ),
            "tag" => format!("{} pushed tag {}", commit.author, commit.branch),
            _ => String::new(),
        }
    };

    Embed {
        title: commit.message.clone(),
        description,
        url: context.build.link.clone(),
        color: resolve_color(color_override, &context.build.status),
        footer: EmbedFooter {
            text: DRONE_DESC.to_string(),
            icon_url: DRONE_ICON_URL.to_string(),
        },
        author: EmbedAuthor {
            name: commit.author.clone(),
            icon_url: commit.avatar.clone(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A bare card holding one rendered message as its title.
fn title_embed(title: String, context: &Context, color_override: &str) -> Embed {
    Embed {
        title,
        color: resolve_color(color_override, &context.build.status),
        ..Default::default()
    }
}
