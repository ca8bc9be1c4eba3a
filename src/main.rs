use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use storybook_generator::ai::HttpProviderFactory;
use storybook_generator::models::{AgeGroup, Config, StoryLength, StoryParameters, StoryType};
use storybook_generator::narration::{narrate_story, ConsoleNarrator, Narrator};
use storybook_generator::store::StoryLibrary;
use storybook_generator::StoryGenerator;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "storybook-generator")]
#[command(about = "Generate illustrated children's stories")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write and illustrate a new story, then save it to the library.
    Generate {
        /// What the story should be about.
        prompt: String,
        #[arg(long, default_value = "6-9")]
        age_group: AgeGroup,
        #[arg(long, default_value = "adventure")]
        story_type: StoryType,
        /// short, medium or long.
        #[arg(long, default_value = "medium")]
        length: StoryLength,
        #[arg(long, default_value = "english")]
        language: String,
        #[arg(long, default_value = "engaging")]
        tone: String,
        /// gemini, openai or stability. Defaults to STORY_PROVIDER.
        #[arg(long)]
        provider: Option<String>,
    },
    /// List saved stories, newest first.
    List,
    /// Read a saved story aloud.
    Read {
        id: String,
        /// 1-based page to start from.
        #[arg(long, default_value_t = 1)]
        from_page: usize,
        /// Seconds to wait after each page. Ctrl-C stops after the current page.
        #[arg(long, default_value_t = 3)]
        pause: u64,
    },
}

async fn run(command: Command, config: Config) -> Result<()> {
    let mut library = StoryLibrary::open(&config.library_path)?;
    info!("Using story library at {}", library.path().display());

    match command {
        Command::Generate {
            prompt,
            age_group,
            story_type,
            length,
            language,
            tone,
            provider,
        } => {
            let provider_name = provider.unwrap_or_else(|| config.provider.clone());
            let provider = provider_name.parse()?;
            let credential = config.credential_for(provider)?;

            let params = StoryParameters {
                prompt,
                age_group,
                story_type,
                story_length: length,
                language,
                tone_style: tone,
            };

            let generator = StoryGenerator::new(HttpProviderFactory::new(config.settings.clone()));
            let story = generator
                .create_story(&credential, &params, &provider_name)
                .await?;

            println!("{}\t{}", story.id, story.title);
            library.add_story(story);
            library.save()?;
        }
        Command::List => {
            for story in library.stories() {
                println!(
                    "{}\t{}\t{}",
                    story.id,
                    story.created_at.format("%Y-%m-%d %H:%M"),
                    story.title
                );
            }
        }
        Command::Read {
            id,
            from_page,
            pause,
        } => {
            let story = library
                .get_story(&id)
                .ok_or_else(|| anyhow!("No story with id '{}'", id))?;
            println!("{}\n", story.title);

            let narrator =
                Arc::new(ConsoleNarrator::new().with_page_pause(Duration::from_secs(pause)));
            let interrupt = {
                let narrator = Arc::clone(&narrator);
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("Stopping narration after the current page");
                        narrator.cancel();
                    }
                })
            };

            let read = narrate_story(narrator.as_ref(), story, from_page.saturating_sub(1)).await;
            interrupt.abort();
            info!("Read {} pages of '{}'", read, story.title);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storybook_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    if let Err(e) = run(args.command, config).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_args_parse_with_defaults() {
        let args = CliArgs::try_parse_from(["storybook-generator", "generate", "a sleepy dragon"])
            .unwrap();
        match args.command {
            Command::Generate {
                prompt,
                age_group,
                length,
                provider,
                ..
            } => {
                assert_eq!(prompt, "a sleepy dragon");
                assert_eq!(age_group, AgeGroup::EarlyReader);
                assert_eq!(length, StoryLength::Medium);
                assert!(provider.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_length_is_accepted() {
        let args = CliArgs::try_parse_from([
            "storybook-generator",
            "generate",
            "owls",
            "--length",
            "epic",
            "--story-type",
            "sci-fi",
        ])
        .unwrap();
        match args.command {
            Command::Generate {
                length, story_type, ..
            } => {
                assert_eq!(length.page_count(), 5);
                assert_eq!(story_type, StoryType::SciFi);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_read_args_parse() {
        let args = CliArgs::try_parse_from([
            "storybook-generator",
            "read",
            "example-1",
            "--from-page",
            "2",
            "--pause",
            "0",
        ])
        .unwrap();
        match args.command {
            Command::Read {
                id,
                from_page,
                pause,
            } => {
                assert_eq!(id, "example-1");
                assert_eq!(from_page, 2);
                assert_eq!(pause, 0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_invalid_age_group_is_rejected() {
        let err = CliArgs::try_parse_from([
            "storybook-generator",
            "generate",
            "owls",
            "--age-group",
            "99",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("age group"));
    }
}
