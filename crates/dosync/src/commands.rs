//! Command handlers
//!
//! Each handler calls one `DomainService` operation and prints its result.
//! Failures bubble up to `main`, which maps them to the exit code.

use anyhow::{Result, bail};
use dosync_core::DomainService;
use dosync_core::request::{CreateRecordRequest, RecordFields, UpdateRecordRequest};

use crate::cli::{Command, DomainCommand, RecordCommand};
use crate::output::{DomainRow, RecordRow, render_detail, render_table};

/// Run one parsed command against the service
pub async fn run(service: &DomainService, command: Command) -> Result<()> {
    match command {
        Command::Domain { command } => domain(service, command).await,
        Command::Record { command } => record(service, command).await,
    }
}

async fn domain(service: &DomainService, command: DomainCommand) -> Result<()> {
    match command {
        DomainCommand::List { paging, local } => {
            let rows: Vec<DomainRow> = if local {
                service
                    .local_domains()
                    .await?
                    .iter()
                    .map(DomainRow::from)
                    .collect()
            } else {
                service
                    .list_domains(paging.page, paging.limit)
                    .await?
                    .iter()
                    .map(DomainRow::from)
                    .collect()
            };
            println!("{}", render_table(&rows, "No domains found"));
        }

        DomainCommand::Get { name } => {
            let domain = service.get_domain(&name).await?;
            println!("{}", render_detail(&domain));
        }

        DomainCommand::Create { name, ip_address } => {
            let domain = service.create_domain(&name, ip_address.as_deref()).await?;
            println!("Domain created");
            println!("{}", render_detail(&domain));
        }

        DomainCommand::Delete { name } => {
            if !service.delete_domain(&name).await {
                bail!("Failed to delete domain {}", name);
            }
            println!("Domain {} deleted", name);
        }

        DomainCommand::Sync => {
            let domains = service.sync_domains().await?;
            let rows: Vec<DomainRow> = domains.iter().map(DomainRow::from).collect();
            println!("Synced {} domain(s)", domains.len());
            if !rows.is_empty() {
                println!("{}", render_table(&rows, ""));
            }
        }
    }

    Ok(())
}

async fn record(service: &DomainService, command: RecordCommand) -> Result<()> {
    match command {
        RecordCommand::List {
            domain,
            paging,
            local,
        } => {
            let rows: Vec<RecordRow> = if local {
                service
                    .local_records(&domain)
                    .await?
                    .iter()
                    .map(RecordRow::from)
                    .collect()
            } else {
                service
                    .list_records(&domain, paging.page, paging.limit)
                    .await?
                    .iter()
                    .map(RecordRow::from)
                    .collect()
            };
            println!("{}", render_table(&rows, "No records found"));
        }

        RecordCommand::Get { domain, id, local } => {
            if local {
                let Some(record) = service.local_record(&domain, id).await? else {
                    bail!("Record {} of {} is not in the local store", id, domain);
                };
                println!("{}", render_table(&[RecordRow::from(&record)], ""));
            } else {
                let record = service.get_record(&domain, id).await?;
                println!("{}", render_detail(&record));
            }
        }

        RecordCommand::Create { domain, fields } => {
            let request = CreateRecordRequest {
                domain_name: domain,
                fields: RecordFields::from(fields),
            };
            let record = service.create_record(&request).await?;
            println!("Record created");
            println!("{}", render_detail(&record));
        }

        RecordCommand::Update { domain, id, fields } => {
            let request = UpdateRecordRequest {
                domain_name: domain,
                record_id: id,
                fields: RecordFields::from(fields),
            };
            let record = service.update_record(&request).await?;
            println!("Record updated");
            println!("{}", render_detail(&record));
        }

        RecordCommand::Delete { domain, id } => {
            if !service.delete_record(&domain, id).await {
                bail!("Failed to delete record {} of {}", id, domain);
            }
            println!("Record {} deleted", id);
        }

        RecordCommand::Sync { domain } => {
            let records = service.sync_records(&domain).await?;
            let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
            println!("Synced {} record(s) for {}", records.len(), domain);
            if !rows.is_empty() {
                println!("{}", render_table(&rows, ""));
            }
        }
    }

    Ok(())
}
