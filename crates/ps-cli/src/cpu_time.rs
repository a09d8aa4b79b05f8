use std::fs;
use std::time::Duration;

/// Clock ticks per second of the `utime`/`stime` fields (`USER_HZ`).
const CLOCK_TICKS_PER_SEC: u64 = 100;

/// User plus system CPU time consumed so far by all threads of this process.
///
/// Returns `None` where `/proc/self/stat` is unavailable or unreadable.
pub fn process_cpu_time() -> Option<Duration> {
    let stat = fs::read_to_string("/proc/self/stat").ok()?;
    parse_stat(&stat)
}

fn parse_stat(stat: &str) -> Option<Duration> {
    // The command name is parenthesised and may itself contain spaces.
    let rest = &stat[stat.rfind(')')? + 1..];
    let mut fields = rest.split_whitespace();
    // `utime` and `stime` are fields 14 and 15; `rest` starts at field 3.
    let utime: u64 = fields.nth(11)?.parse().ok()?;
    let stime: u64 = fields.next()?.parse().ok()?;
    Some(Duration::from_millis((utime + stime) * 1000 / CLOCK_TICKS_PER_SEC))
}
