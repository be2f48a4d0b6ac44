use std::io::Read;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roadmap_sync::models::{EdgeId, NodeId, Position, ResourceListId, RoadmapId};
use roadmap_sync::render::{render_resources, render_roadmap, Progress};
use roadmap_sync::{ClientConfig, RoadmapClient};

#[derive(Parser)]
#[command(name = "roadmap")]
#[command(about = "Edit learning roadmaps and track progress through their resources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login { username: String, password: String },
    /// Create an account and log in
    Register { username: String, password: String },
    /// End the current session
    Logout,
    /// List your roadmaps
    List,
    /// List roadmaps shared with you
    Shared,
    /// Create a roadmap
    Create {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete one of your roadmaps
    Delete { roadmap: String },
    /// Share a roadmap with another user
    Share { roadmap: String, username: String },
    /// Render a roadmap as a tree with completion progress
    Show { roadmap: String },
    /// Add a node to a roadmap
    AddNode {
        roadmap: String,
        title: String,
        /// Canvas position as `x,y`
        #[arg(long, value_parser = parse_position)]
        at: Option<Position>,
    },
    /// Rename a node
    RenameNode {
        roadmap: String,
        node: String,
        title: String,
    },
    /// Delete a node and its edges
    DeleteNode { roadmap: String, node: String },
    /// Connect two nodes
    AddEdge {
        roadmap: String,
        source: String,
        target: String,
    },
    /// Remove an edge
    DeleteEdge { roadmap: String, edge: String },
    /// Show a node's resources
    Resources { roadmap: String, node: String },
    /// Append a resource to a node
    AddResource {
        roadmap: String,
        node: String,
        title: String,
    },
    /// Remove the resource at a position
    RemoveResource {
        roadmap: String,
        node: String,
        index: usize,
    },
    /// Move a resource to another position
    MoveResource {
        roadmap: String,
        node: String,
        from: usize,
        to: usize,
    },
    /// Toggle completion of the resource at a position
    Toggle {
        roadmap: String,
        node: String,
        index: usize,
    },
    /// Print a resource's content
    Content {
        roadmap: String,
        node: String,
        index: usize,
    },
    /// Replace a resource's content with stdin
    SaveContent {
        roadmap: String,
        node: String,
        index: usize,
    },
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| "expected `x,y`".to_string())?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Position { x, y })
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "roadmap_sync=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ClientConfig::load();
    let client = RoadmapClient::from_config(&config)?;

    match cli.command {
        Commands::Login { username, password } => {
            let user = client.auth().login(&username, &password).await?;
            println!("Logged in as {} ({})", username, user);
        }
        Commands::Register { username, password } => {
            let user = client.auth().register(&username, &password).await?;
            println!("Registered {} ({})", username, user);
        }
        Commands::Logout => {
            client.logout().await;
            println!("Logged out");
        }
        Commands::List => {
            for roadmap in client.roadmaps().list_own_roadmaps().await? {
                println!("{}  {}", roadmap.id, roadmap.title);
            }
        }
        Commands::Shared => {
            for shared in client.roadmaps().list_shared_roadmaps().await? {
                println!(
                    "{}  {}  (by {})",
                    shared.roadmap.id, shared.roadmap.title, shared.owner_name
                );
            }
        }
        Commands::Create { title, description } => {
            let id = client
                .roadmaps()
                .create_roadmap(&title, &description)
                .await?;
            println!("Created roadmap {}", id);
        }
        Commands::Delete { roadmap } => {
            refresh_roadmaps(&client).await?;
            client
                .roadmaps()
                .delete_roadmap(&RoadmapId::new(roadmap))
                .await?;
            println!("Deleted");
        }
        Commands::Share { roadmap, username } => {
            open(&client, &roadmap).await?;
            client.roadmaps().share_roadmap(&username).await?;
            println!("Shared with {}", username);
        }
        Commands::Show { roadmap } => {
            open(&client, &roadmap).await?;
            client.roadmaps().wait_for_prefetch().await;
            print_roadmap(&client);
        }
        Commands::AddNode { roadmap, title, at } => {
            open(&client, &roadmap).await?;
            let node = client.roadmaps().add_node(&title, at).await?;
            println!("Added node {}", node.id);
        }
        Commands::RenameNode {
            roadmap,
            node,
            title,
        } => {
            open(&client, &roadmap).await?;
            client
                .roadmaps()
                .update_node_title(&NodeId::new(node), &title)
                .await?;
            println!("Renamed");
        }
        Commands::DeleteNode { roadmap, node } => {
            open(&client, &roadmap).await?;
            client.roadmaps().delete_node(&NodeId::new(node)).await?;
            println!("Deleted node");
        }
        Commands::AddEdge {
            roadmap,
            source,
            target,
        } => {
            open(&client, &roadmap).await?;
            let edge = client
                .roadmaps()
                .add_edge(&NodeId::new(source), &NodeId::new(target))
                .await?;
            println!("Added edge {}", edge.id);
        }
        Commands::DeleteEdge { roadmap, edge } => {
            open(&client, &roadmap).await?;
            client.roadmaps().delete_edge(&EdgeId::new(edge)).await?;
            println!("Deleted edge");
        }
        Commands::Resources { roadmap, node } => {
            open(&client, &roadmap).await?;
            select(&client, &node).await?;
            print_resources(&client, &node)?;
        }
        Commands::AddResource {
            roadmap,
            node,
            title,
        } => {
            open(&client, &roadmap).await?;
            let list = select(&client, &node).await?;
            client.resources().append_resource(&list, &title).await?;
            print_resources(&client, &node)?;
        }
        Commands::RemoveResource {
            roadmap,
            node,
            index,
        } => {
            open(&client, &roadmap).await?;
            let list = select(&client, &node).await?;
            client.resources().remove_resource(&list, index).await?;
            print_resources(&client, &node)?;
        }
        Commands::MoveResource {
            roadmap,
            node,
            from,
            to,
        } => {
            open(&client, &roadmap).await?;
            let list = select(&client, &node).await?;
            client.resources().reorder_resource(&list, from, to).await?;
            print_resources(&client, &node)?;
        }
        Commands::Toggle {
            roadmap,
            node,
            index,
        } => {
            open(&client, &roadmap).await?;
            let list = select(&client, &node).await?;
            let resource = resource_at(&client, &list, index)?;
            let checked = client.completions().toggle_completion(&resource).await?;
            println!("{}", if checked { "Done" } else { "Not done" });
        }
        Commands::Content {
            roadmap,
            node,
            index,
        } => {
            open(&client, &roadmap).await?;
            let list = select(&client, &node).await?;
            let resource = resource_at(&client, &list, index)?;
            print!("{}", client.content().load_content(&resource).await?);
        }
        Commands::SaveContent {
            roadmap,
            node,
            index,
        } => {
            open(&client, &roadmap).await?;
            let list = select(&client, &node).await?;
            let resource = resource_at(&client, &list, index)?;
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read content from stdin")?;
            client.content().save_content(&resource, &content).await?;
            println!("Saved");
        }
    }

    Ok(())
}

/// Fetch both roadmap lists so any visible roadmap can be resolved by id.
async fn refresh_roadmaps(client: &RoadmapClient) -> anyhow::Result<()> {
    client.roadmaps().list_own_roadmaps().await?;
    if let Err(e) = client.roadmaps().list_shared_roadmaps().await {
        tracing::warn!("Could not load shared roadmaps: {}", e);
    }
    Ok(())
}

async fn open(client: &RoadmapClient, roadmap: &str) -> anyhow::Result<()> {
    refresh_roadmaps(client).await?;
    client.roadmaps().load_roadmap(&RoadmapId::new(roadmap)).await?;
    Ok(())
}

async fn select(client: &RoadmapClient, node: &str) -> anyhow::Result<ResourceListId> {
    let id = NodeId::new(node);
    client.roadmaps().select_node(&id).await?;
    match client.roadmaps().node(&id) {
        Some(node) => Ok(node.enrichment),
        None => bail!("Node {} not found", id),
    }
}

fn resource_at(
    client: &RoadmapClient,
    list: &ResourceListId,
    index: usize,
) -> anyhow::Result<roadmap_sync::models::ResourceId> {
    client
        .resources()
        .resources(list)
        .and_then(|resources| resources.into_iter().find(|r| r.index == index))
        .map(|r| r.resource)
        .with_context(|| format!("No resource at position {}", index))
}

fn print_roadmap(client: &RoadmapClient) {
    if let Some(roadmap) = client.roadmaps().active_roadmap() {
        println!("{}", roadmap.title);
        if !roadmap.description.is_empty() {
            println!("{}", roadmap.description);
        }
        println!();
    }

    let nodes = client.roadmaps().nodes();
    let edges = client.roadmaps().edges();
    let output = render_roadmap(&nodes, &edges, |node| {
        let resources = client
            .resources()
            .resources(&node.enrichment)
            .unwrap_or_default();
        let done = resources
            .iter()
            .filter(|r| client.completions().is_checked(&r.resource) == Some(true))
            .count();
        Progress {
            done,
            total: resources.len(),
        }
    });
    print!("{}", output);
}

fn print_resources(client: &RoadmapClient, node: &str) -> anyhow::Result<()> {
    let node = client
        .roadmaps()
        .node(&NodeId::new(node))
        .with_context(|| format!("Node {} not found", node))?;
    let resources = client
        .resources()
        .resources(&node.enrichment)
        .unwrap_or_default();
    println!("{}", node.title);
    print!(
        "{}",
        render_resources(&resources, |r| client.completions().is_checked(&r.resource))
    );
    Ok(())
}
