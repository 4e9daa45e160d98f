use clap::{Parser, Subcommand};

/// Givegate — donation & event gateway
#[derive(Parser)]
#[command(name = "givegate", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server
    Serve {
        /// Port to bind
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Inspect the event journal
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// List journal entries, newest-first
    List {
        /// Only show unread entries
        #[arg(long)]
        unread: bool,
    },
    /// Print the unread count
    Unread,
    /// Mark one entry as read
    Read { id: i64 },
    /// Mark every entry as read
    ReadAll,
}
