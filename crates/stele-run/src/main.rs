//! Script driver for the stele arena.
//!
//! Reads an allocation script from stdin: a case count, a blank line,
//! then one signed integer per line for each case (cases are separated
//! by blank lines). A positive value `v` allocates `v` doubles from a
//! fresh 1000-byte arena; a negative value `-k` frees the k-th live
//! allocation, 1-based, in ascending offset order. After each case the
//! arena's head-sentinel walk is printed on one line.

#![forbid(unsafe_code)]

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use smallvec::SmallVec;
use stele_arena::TypedArena;

/// Arena capacity used for every case, matching the script format's
/// reference layout (an initial sentinel walk of `992`).
const ARENA_BYTES: usize = 1000;

/// Offsets of live allocations for one case, kept sorted ascending.
type LiveList = SmallVec<[usize; 8]>;

fn apply(
    arena: &mut TypedArena<f64>,
    live: &mut LiveList,
    value: i64,
) -> Result<(), Box<dyn Error>> {
    if value > 0 {
        let offset = arena
            .allocate(value as usize)?
            .ok_or("arena exhausted")?;
        let at = live.partition_point(|&o| o < offset);
        live.insert(at, offset);
    } else if value < 0 {
        let index = usize::try_from(-value)? - 1;
        if index >= live.len() {
            return Err(format!("no live allocation at index {}", -value).into());
        }
        arena.deallocate(live[index])?;
        live.remove(index);
    } else {
        return Err("zero is not a valid script value".into());
    }
    Ok(())
}

fn run<R: BufRead, W: Write>(input: R, out: &mut W) -> Result<(), Box<dyn Error>> {
    let mut lines = input.lines();
    let cases: usize = lines
        .next()
        .ok_or("missing case count")??
        .trim()
        .parse()?;
    // Blank separator after the count.
    lines.next().transpose()?;

    for _ in 0..cases {
        let mut arena = TypedArena::<f64>::new(ARENA_BYTES)?;
        let mut live = LiveList::new();

        for line in lines.by_ref() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            apply(&mut arena, &mut live, trimmed.parse()?)?;
        }

        let walk: Vec<String> = arena.raw().sentinels().iter().map(i32::to_string).collect();
        writeln!(out, "{}", walk.join(" "))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    match run(stdin.lock(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("stele-run: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(script: &str) -> String {
        let mut out = Vec::new();
        run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_case_prints_the_initial_walk() {
        assert_eq!(drive("1\n\n\n"), "992\n");
    }

    #[test]
    fn whole_arena_take_prints_one_negative_tag() {
        // 123 doubles want 984 of the 992 available bytes; the 8-byte
        // remainder folds into the served block.
        assert_eq!(drive("1\n\n123\n"), "-992\n");
    }

    #[test]
    fn split_prints_allocated_then_free() {
        assert_eq!(drive("1\n\n5\n"), "-40 944\n");
    }

    #[test]
    fn free_by_ascending_index_coalesces() {
        // Allocate two blocks, free the lower-addressed one, then the
        // remaining one: back to a single free block.
        let script = "1\n\n1\n2\n-1\n-1\n";
        assert_eq!(drive(script), "992\n");
    }

    #[test]
    fn partial_free_leaves_the_island() {
        // Free the first of two allocations: an 8-byte free block, the
        // still-allocated second, then the trailing free space.
        let script = "1\n\n1\n2\n-1\n";
        assert_eq!(drive(script), "8 -16 952\n");
    }

    #[test]
    fn multiple_cases_reset_the_arena() {
        let script = "2\n\n5\n\n123\n";
        assert_eq!(drive(script), "-40 944\n-992\n");
    }

    #[test]
    fn missing_case_count_errors() {
        let mut out = Vec::new();
        assert!(run("".as_bytes(), &mut out).is_err());
    }

    #[test]
    fn zero_value_errors() {
        let mut out = Vec::new();
        assert!(run("1\n\n0\n".as_bytes(), &mut out).is_err());
    }

    #[test]
    fn out_of_range_free_index_errors() {
        let mut out = Vec::new();
        assert!(run("1\n\n1\n-2\n".as_bytes(), &mut out).is_err());
    }
}
