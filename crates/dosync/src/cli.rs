//! Command-line definitions

use clap::{Args, Parser, Subcommand};
use dosync_core::request::{DEFAULT_PAGE, DEFAULT_PER_PAGE, RecordFields};

/// Synchronize DigitalOcean DNS domains and records with a local store
#[derive(Debug, Parser)]
#[command(name = "dosync", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage domains
    Domain {
        #[command(subcommand)]
        command: DomainCommand,
    },

    /// Manage domain records
    Record {
        #[command(subcommand)]
        command: RecordCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum DomainCommand {
    /// List domains
    List {
        #[command(flatten)]
        paging: PageArgs,

        /// Read from the local store instead of the API
        #[arg(long)]
        local: bool,
    },

    /// Show one remote domain
    Get { name: String },

    /// Create a domain
    Create {
        name: String,

        /// Create an apex A record pointing at this address
        #[arg(long)]
        ip_address: Option<String>,
    },

    /// Delete a domain
    Delete { name: String },

    /// Pull remote domains into the local store
    Sync,
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// List the records of a domain
    List {
        domain: String,

        #[command(flatten)]
        paging: PageArgs,

        /// Read from the local store instead of the API
        #[arg(long)]
        local: bool,
    },

    /// Show one record
    Get {
        domain: String,
        id: i64,

        /// Read from the local store instead of the API
        #[arg(long)]
        local: bool,
    },

    /// Create a record
    Create {
        domain: String,

        #[command(flatten)]
        fields: RecordArgs,
    },

    /// Replace a record
    Update {
        domain: String,
        id: i64,

        #[command(flatten)]
        fields: RecordArgs,
    },

    /// Delete a record
    Delete { domain: String, id: i64 },

    /// Pull the records of a domain into the local store
    Sync { domain: String },
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    pub page: u32,

    /// Entries per page
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub limit: u32,
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Record type (A, AAAA, CNAME, MX, TXT, NS, SRV, CAA)
    #[arg(long = "type", value_name = "TYPE")]
    pub record_type: String,

    /// Host name relative to the domain ("@" for the apex)
    #[arg(long)]
    pub name: String,

    /// Record value
    #[arg(long)]
    pub data: String,

    #[arg(long)]
    pub priority: Option<i64>,

    #[arg(long)]
    pub port: Option<i64>,

    /// Time to live in seconds
    #[arg(long)]
    pub ttl: Option<i64>,

    #[arg(long)]
    pub weight: Option<i64>,

    /// CAA flags
    #[arg(long)]
    pub flags: Option<String>,

    /// CAA tag
    #[arg(long)]
    pub tag: Option<String>,
}

impl From<RecordArgs> for RecordFields {
    fn from(args: RecordArgs) -> Self {
        let mut fields = RecordFields::new(args.record_type, args.name, args.data);
        fields.priority = args.priority;
        fields.port = args.port;
        fields.ttl = args.ttl;
        fields.weight = args.weight;
        fields.flags = args.flags;
        fields.tag = args.tag;
        fields
    }
}
