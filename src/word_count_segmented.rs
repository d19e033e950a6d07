use std::io;
use std::process::exit;
use std::time::Instant;

use tokio::runtime::Builder;

use segmented_word_count::logging::set_logger_or_exit;
use segmented_word_count::util::*;
use segmented_word_count::{count_parallel, Text};

async fn run(conf: &Config) -> io::Result<()> {
    let bytes = read_input(&conf.input).await?;
    let text = Text::from_utf8(bytes)?;

    let progress = conf.progress;
    let result = count_parallel(&text, conf.threads, conf.top, |stats| {
        if progress {
            eprintln!("{}", format_segment_stats(stats));
        }
    })
    .await
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let output = open_output(&conf.output).await?;
    let echo = if conf.echo { Some(&text) } else { None };
    write_result(output, echo, &result, conf.print_all).await?;

    Ok(())
}

fn main() {
    let conf = parse_args("word count on whitespace-aligned segments, one worker per segment");
    set_logger_or_exit(&conf.log_stream, conf.log_level());

    if let Err(e) = conf.validate() {
        eprintln!("error: {}", e);
        exit(2);
    }

    let (start_usr_time, start_sys_time) = get_cputime_usecs();
    let start_time = Instant::now();

    let runtime = match Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("can't start async runtime: {}", e);
            exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(&conf)) {
        eprintln!("error: {}", e);
        exit(1);
    }

    let difference = start_time.elapsed();
    let (end_usr_time, end_sys_time) = get_cputime_usecs();
    let usr_time = end_usr_time.saturating_sub(start_usr_time) as f64 / 1_000_000.0;
    let sys_time = end_sys_time.saturating_sub(start_sys_time) as f64 / 1_000_000.0;
    eprintln!(
        "walltime: {:?} (usr: {:.3}s sys: {:.3}s)",
        difference, usr_time, sys_time
    );
}
