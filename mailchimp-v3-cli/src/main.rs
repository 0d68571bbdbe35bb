use anyhow::Context;
use clap::{Parser, Subcommand};
use mailchimp_v3::{subscriber_hash, Client, MemberTagsQuery, Page, SubscribeOptions};
use serde::Serialize;
use std::{collections::BTreeMap, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser, Clone)]
#[command(name = "mailchimp-v3")]
#[command(about = "A CLI tool to manage subscribers, merge fields, interests and tags of mailchimp lists")]
struct Cli {
    #[arg(short, long, env = "MAILCHIMP_API_KEY")]
    api_key: String,
    /// Overrides the endpoint derived from the API key's datacenter
    #[arg(short, long, env = "MAILCHIMP_ENDPOINT")]
    endpoint: Option<String>,
    /// Request timeout in seconds
    #[arg(short, long, env = "MAILCHIMP_TIMEOUT", default_value_t = 10)]
    timeout: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
struct Member {
    list_id: String,
    email: String,
}

#[derive(Debug, Clone, clap::Args)]
struct Paging {
    #[arg(long, default_value_t = 0)]
    offset: usize,
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

impl From<Paging> for Page {
    fn from(paging: Paging) -> Self {
        Page {
            offset: paging.offset,
            limit: paging.limit,
        }
    }
}

#[derive(Debug, Subcommand, Clone)]
enum Commands {
    #[command(about = "Checks that the API key is accepted")]
    Validate,
    #[command(about = "Prints the account details")]
    Account,
    #[command(about = "Prints the status of a list member")]
    Status(Member),
    #[command(about = "Subscribes an email address to a list")]
    Subscribe {
        #[command(flatten)]
        member: Member,
        /// Subscribe straight away instead of sending a confirmation email
        #[arg(long)]
        no_double_opt_in: bool,
        /// Merge field as TAG=VALUE, may be repeated
        #[arg(long = "merge-field", value_parser = parse_key_value)]
        merge_fields: Vec<(String, String)>,
        /// Interest id to opt into, may be repeated
        #[arg(long = "interest")]
        interests: Vec<String>,
    },
    #[command(about = "Unsubscribes an email address from a list")]
    Unsubscribe(Member),
    #[command(about = "Permanently removes an email address from a list")]
    Remove(Member),
    #[command(about = "Lists the merge fields of a list")]
    MergeFields {
        list_id: String,
        #[command(flatten)]
        paging: Paging,
    },
    #[command(about = "Lists the interest categories of a list")]
    InterestCategories {
        list_id: String,
        #[command(flatten)]
        paging: Paging,
    },
    #[command(about = "Lists the interests of an interest category")]
    Interests {
        list_id: String,
        group_id: String,
        #[command(flatten)]
        paging: Paging,
    },
    #[command(about = "Lists the tags of a list member")]
    Tags {
        #[command(flatten)]
        member: Member,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        exclude_fields: Vec<String>,
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    #[command(about = "Adds tags to a list member")]
    AddTags {
        #[command(flatten)]
        member: Member,
        #[arg(required = true)]
        tags: Vec<String>,
        #[arg(long)]
        is_syncing: bool,
    },
    #[command(about = "Removes tags from a list member")]
    RemoveTags {
        #[command(flatten)]
        member: Member,
        #[arg(required = true)]
        tags: Vec<String>,
        #[arg(long)]
        is_syncing: bool,
    },
    #[command(about = "Prints the subscriber hash of an email address")]
    Hash { email: String },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected TAG=VALUE, got {s:?}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mailchimp_v3=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let client = match &args.endpoint {
        Some(endpoint) => Client::with_endpoint(endpoint.as_str(), args.api_key.as_str()),
        None => Client::new(args.api_key.as_str()),
    }
    .context("Could not create the mailchimp client")?
    .with_timeout(Duration::from_secs(args.timeout));

    match args.command {
        Commands::Validate => {
            if client.validate_api_key().await {
                println!("API key is valid");
            } else {
                anyhow::bail!("API key was rejected by {}", client.endpoint());
            }
        }
        Commands::Account => match client.get_account_details().await? {
            Some(details) => print_json(&details)?,
            None => anyhow::bail!("Could not connect to {}", client.endpoint()),
        },
        Commands::Status(Member { list_id, email }) => {
            let status = client.get_subscriber_status(&list_id, &email).await?;
            println!("{status}");
        }
        Commands::Subscribe {
            member: Member { list_id, email },
            no_double_opt_in,
            merge_fields,
            interests,
        } => {
            let options = SubscribeOptions {
                merge_fields: merge_fields
                    .into_iter()
                    .map(|(k, v)| (k, v.into()))
                    .collect(),
                double_opt_in: !no_double_opt_in,
                interests: interests.into_iter().map(|id| (id, true)).collect::<BTreeMap<_, _>>(),
            };
            if client.subscribe_to_list(&list_id, &email, options).await? {
                println!("Subscribed {email} to {list_id}");
            } else {
                println!("{email} was not subscribed to {list_id}");
            }
        }
        Commands::Unsubscribe(Member { list_id, email }) => {
            if client.unsubscribe_from_list(&list_id, &email).await? {
                println!("Unsubscribed {email} from {list_id}");
            } else {
                anyhow::bail!("Could not unsubscribe {email} from {list_id}");
            }
        }
        Commands::Remove(Member { list_id, email }) => {
            if client.remove_from_list(&list_id, &email).await? {
                println!("Removed {email} from {list_id}");
            } else {
                anyhow::bail!("Could not remove {email} from {list_id}");
            }
        }
        Commands::MergeFields { list_id, paging } => {
            print_json(&client.get_list_fields(&list_id, paging.into()).await?)?
        }
        Commands::InterestCategories { list_id, paging } => {
            print_json(&client.get_list_group_categories(&list_id, paging.into()).await?)?
        }
        Commands::Interests {
            list_id,
            group_id,
            paging,
        } => print_json(&client.get_list_group(&list_id, &group_id, paging.into()).await?)?,
        Commands::Tags {
            member: Member { list_id, email },
            fields,
            exclude_fields,
            count,
            offset,
        } => {
            let query = MemberTagsQuery {
                fields,
                exclude_fields,
                count,
                offset,
            };
            print_json(&client.get_member_tags(&list_id, &email, query).await?)?
        }
        Commands::AddTags {
            member: Member { list_id, email },
            tags,
            is_syncing,
        } => {
            if !client
                .add_member_tags(&list_id, &email, tags, is_syncing)
                .await?
            {
                anyhow::bail!("Could not add tags to {email}");
            }
        }
        Commands::RemoveTags {
            member: Member { list_id, email },
            tags,
            is_syncing,
        } => {
            if !client
                .remove_member_tags(&list_id, &email, tags, is_syncing)
                .await?
            {
                anyhow::bail!("Could not remove tags from {email}");
            }
        }
        Commands::Hash { email } => println!("{}", subscriber_hash(&email)),
    }

    Ok(())
}
