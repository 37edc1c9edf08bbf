use crate::context::AppContext;
use crate::format::{self, Formattable, OutputFormat};
use libimagetag::{Credentials, TagLister, TagOrder, TagQuery};
use serde::Serialize;
use std::io::{BufRead, IsTerminal};

/// Options gathered from the `tags` subcommand
#[derive(Debug, Clone)]
pub struct TagsOptions {
    pub image: String,
    pub registry: Option<String>,
    pub filter: Option<String>,
    pub reverse: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_stdin: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl TagsOptions {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            registry: None,
            filter: None,
            reverse: false,
            username: None,
            password: None,
            password_stdin: false,
            format: OutputFormat::Pretty,
            quiet: false,
        }
    }
}

/// What the `tags` command prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagsOutput {
    pub image: String,
    pub registry: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Formattable for TagsOutput {
    fn format_pretty(&self, ctx: &AppContext) -> String {
        if self.tags.is_empty() {
            return format!("No tags found for image '{}'.", self.image);
        }

        // First line is the newest tag in the default ordering
        let mut lines = Vec::with_capacity(self.tags.len());
        for (i, tag) in self.tags.iter().enumerate() {
            if i == 0 {
                lines.push(format::highlight(ctx, tag));
            } else {
                lines.push(tag.clone());
            }
        }
        lines.join("\n")
    }
}

/// Builds the library query, filling gaps from the configuration.
pub fn build_query(ctx: &AppContext, opts: &TagsOptions) -> TagQuery {
    let registry = &ctx.config.registry;
    let registry_url = opts
        .registry
        .clone()
        .unwrap_or_else(|| registry.default_url.clone());
    let filter = opts
        .filter
        .clone()
        .unwrap_or_else(|| registry.default_filter.clone());
    let order = if opts.reverse {
        TagOrder::Ascending
    } else {
        registry.default_order
    };

    TagQuery::new(opts.image.as_str(), registry_url)
        .with_filter(filter)
        .with_order(order)
}

/// Reads a password from the first line of `reader`.
pub fn read_password_from<R: BufRead>(mut reader: R) -> Result<String, String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| format!("Failed to read password from stdin: {}", e))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Resolves credentials from flags, stdin and, when `interactive`, a prompt.
pub fn resolve_credentials<R: BufRead>(
    opts: &TagsOptions,
    stdin: R,
    interactive: bool,
) -> Result<Credentials, String> {
    let mut password = if opts.password_stdin {
        Some(read_password_from(stdin)?)
    } else {
        opts.password.clone()
    };

    if password.is_none() && interactive {
        if let Some(username) = opts.username.as_deref().filter(|u| !u.is_empty()) {
            let prompted = rpassword::prompt_password(format!("Password for {}: ", username))
                .map_err(|e| format!("Failed to read password: {}", e))?;
            password = Some(prompted);
        }
    }

    tracing::debug!(
        username = opts.username.is_some(),
        password = password.is_some(),
        "resolved credentials"
    );
    Ok(Credentials::from_parts(opts.username.clone(), password))
}

/// Runs the listing and packs the outcome for printing.
pub fn run_tags(
    ctx: &AppContext,
    opts: &TagsOptions,
    credentials: &Credentials,
) -> Result<TagsOutput, String> {
    let query = build_query(ctx, opts);
    let lister = TagLister::from_config(&ctx.config);

    let result = lister
        .list_tags(&query, credentials)
        .map_err(|e| e.to_string())?;

    Ok(TagsOutput {
        image: query.image,
        registry: query.registry_url,
        tags: result.tags,
        error: result.error_message.filter(|m| !m.is_empty()),
    })
}

/// Handle the tags command
pub fn handle_tags(ctx: &AppContext, opts: &TagsOptions) {
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let credentials = match resolve_credentials(opts, stdin.lock(), interactive) {
        Ok(creds) => creds,
        Err(e) => {
            format::error(ctx, &e);
            std::process::exit(1);
        }
    };

    let output = match run_tags(ctx, opts, &credentials) {
        Ok(output) => output,
        Err(e) => {
            format::error(ctx, &e);
            std::process::exit(1);
        }
    };

    if opts.quiet {
        for tag in &output.tags {
            println!("{}", tag);
        }
    } else if output.error.is_none() || opts.format != OutputFormat::Pretty {
        match format::format_output(ctx, &output, opts.format) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                format::error(ctx, &e);
                std::process::exit(1);
            }
        }
    }

    if let Some(message) = &output.error {
        format::error(ctx, message);
        std::process::exit(1);
    }
}

#[cfg(test)]
#[path = "tags_tests.rs"]
mod tests;
