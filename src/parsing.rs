use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufRead;
use tracing::debug;

use crate::error::Result;

/// Parses a file using mmap, splitting it into line-aligned chunks that are
/// parsed in parallel. Values keep their file order.
pub fn read_file_mmap(file: &File) -> Result<Vec<f64>> {
    // SAFETY: the map is read-only and dropped before returning
    let mmap = unsafe { Mmap::map(file)? };

    if mmap.is_empty() {
        return Ok(Vec::new());
    }

    let num_threads = rayon::current_num_threads();
    let chunk_size = mmap.len().div_ceil(num_threads);

    // Chunks must end on a line break so no token or comment is split
    let mut boundaries = vec![0];
    for i in 1..num_threads {
        let mut pos = i * chunk_size;
        if pos >= mmap.len() {
            break;
        }
        while pos < mmap.len() && mmap[pos] != b'\n' {
            pos += 1;
        }
        if pos < mmap.len() {
            boundaries.push(pos + 1);
        }
    }
    boundaries.push(mmap.len());

    // A long line can push two scans onto the same newline
    boundaries.dedup();

    let chunks: Vec<_> = boundaries.windows(2).map(|w| (w[0], w[1])).collect();

    let results: Vec<(Vec<f64>, usize)> = chunks
        .par_iter()
        .map(|&(start, end)| parse_chunk(&mmap[start..end]))
        .collect();

    let skipped: usize = results.iter().map(|(_, s)| s).sum();
    let values: Vec<f64> = results.into_iter().flat_map(|(v, _)| v).collect();
    debug!(parsed = values.len(), skipped, "read input file");

    Ok(values)
}

/// Reads values from a buffered reader (typically stdin), line by line.
pub fn read_reader<R: BufRead>(reader: R) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    let mut skipped = 0;

    for line in reader.lines() {
        skipped += parse_line(line?.as_bytes(), &mut values);
    }
    debug!(parsed = values.len(), skipped, "read input stream");

    Ok(values)
}

/// Parses newline-delimited text. Returns the values and the number of
/// tokens that were not finite numbers.
fn parse_chunk(chunk: &[u8]) -> (Vec<f64>, usize) {
    let mut values = Vec::new();
    let skipped = chunk
        .split(|&b| b == b'\n')
        .map(|line| parse_line(line, &mut values))
        .sum();
    (values, skipped)
}

/// Parses one line into `values`: tokens separated by commas or whitespace,
/// anything after `#` ignored. `nan` and `inf` count as unparseable.
/// Returns the count of unparseable tokens.
fn parse_line(line: &[u8], values: &mut Vec<f64>) -> usize {
    let line = match line.iter().position(|&b| b == b'#') {
        Some(idx) => &line[..idx],
        None => line,
    };

    let mut skipped = 0;
    for token in line
        .split(|&b| b == b',' || b.is_ascii_whitespace())
        .filter(|t| !t.is_empty())
    {
        match std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
        {
            Some(v) if v.is_finite() => values.push(v),
            _ => skipped += 1,
        }
    }
    skipped
}
