use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

use serde::Serialize;

use stacker_api::Block;
use stacker_engine::{Blocked, LocalCollection, block, read_records};

use crate::config::Effective;
use crate::error::CliError;

/// One output line per block.
#[derive(Debug, Serialize)]
struct BlockSummary {
    partition: usize,
    index: usize,
    kind: &'static str,
    rows: usize,
    shape: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldSummary>,
}

#[derive(Debug, Serialize)]
struct FieldSummary {
    kind: &'static str,
    shape: Vec<usize>,
}

impl BlockSummary {
    fn new(partition: usize, index: usize, block: &Block) -> Self {
        let fields = block
            .as_tuple()
            .unwrap_or_default()
            .iter()
            .map(|f| FieldSummary {
                kind: f.kind().as_str(),
                shape: f.shape(),
            })
            .collect();
        Self {
            partition,
            index,
            kind: block.kind().as_str(),
            rows: block.len(),
            shape: block.shape(),
            fields,
        }
    }
}

pub fn run(eff: &Effective) -> Result<(), CliError> {
    let stdout = io::stdout();
    let out = stdout.lock();
    match eff.input.as_deref() {
        None | Some("-") => write_blocks(io::stdin().lock(), "stdin", eff, out),
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::Input {
                path: path.to_string(),
                source,
            })?;
            write_blocks(BufReader::new(file), path, eff, out)
        }
    }
}

/// Block the records read from `input` and write one summary line per block.
fn write_blocks<R, W>(input: R, source: &str, eff: &Effective, mut out: W) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
{
    let records = read_records(input, eff.layout).map_err(|e| e.with_context(source))?;
    tracing::info!(
        records = records.len(),
        partitions = eff.partitions,
        layout = %eff.layout,
        source,
        "loaded input"
    );

    let collection = LocalCollection::from_records(records, eff.partitions);
    let blocks = match block(collection, eff.block_size)? {
        Blocked::Blocks(blocks) => blocks,
        Blocked::Unchanged(_) => {
            tracing::info!("input is empty, returned unchanged");
            return Ok(());
        }
    };

    let mut total = 0;
    for (partition, results) in blocks.into_partitions().into_iter().enumerate() {
        for (index, result) in results.into_iter().enumerate() {
            let block = result.map_err(|source| CliError::Partition { partition, source })?;
            serde_json::to_writer(&mut out, &BlockSummary::new(partition, index, &block))?;
            writeln!(out)?;
            total += 1;
        }
    }
    out.flush()?;
    tracing::info!(blocks = total, "finished");
    Ok(())
}
