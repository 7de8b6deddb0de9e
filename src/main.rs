use rewind::core::RewindCore;
use rewind::import;
use rewind::model::{FilterQuery, WeekId};
use std::path::PathBuf;
use time::Date;
use time::macros::format_description;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum View {
    #[default]
    Leaderboard,
    Records,
    Summary,
    Top,
    Week,
    History,
}

#[derive(Debug, Default)]
struct CliArgs {
    data: Option<PathBuf>,
    filter: FilterQuery,
    view: View,
    week: Option<WeekId>,
    track: Option<String>,
    top: usize,
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    let Some(data) = &args.data else {
        anyhow::bail!("--data <dir> is required (see --help)");
    };

    let table = import::load_export_dir(data)?;
    let mut core = RewindCore::from_events(table);
    core.set_filter(args.filter.clone());

    match args.view {
        View::Leaderboard => print_leaderboard(&mut core, &args),
        View::Records => print_records(&mut core, &args),
        View::Summary => print_summary(&mut core, &args),
        View::Top => print_top(&mut core, &args),
        View::Week => print_week(&mut core, &args),
        View::History => print_history(&mut core, &args),
    }
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs {
        top: 15,
        ..CliArgs::default()
    };
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--data" => out.data = Some(PathBuf::from(required_value(&args, &mut index)?)),
            "--from" => {
                out.filter.start_date = Some(parse_date(&required_value(&args, &mut index)?)?);
            }
            "--to" => {
                out.filter.end_date = Some(parse_date(&required_value(&args, &mut index)?)?);
            }
            "--artist" => out.filter.artists.push(required_value(&args, &mut index)?),
            "--album" => out.filter.albums.push(required_value(&args, &mut index)?),
            "--track" => out.filter.tracks.push(required_value(&args, &mut index)?),
            "--leaderboard" => out.view = View::Leaderboard,
            "--records" => out.view = View::Records,
            "--summary" => out.view = View::Summary,
            "--top" => {
                out.view = View::Top;
                let value = required_value(&args, &mut index)?;
                out.top = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("--top expects a number, got {value}"))?;
            }
            "--week" => {
                let value = required_value(&args, &mut index)?;
                let Some(week) = WeekId::parse(&value) else {
                    anyhow::bail!("--week expects <year>-W<week>, got {value}");
                };
                out.view = View::Week;
                out.week = Some(week);
            }
            "--history" => {
                out.view = View::History;
                out.track = Some(required_value(&args, &mut index)?);
            }
            "--json" => out.json = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn required_value(args: &[String], index: &mut usize) -> anyhow::Result<String> {
    let flag = args[*index].clone();
    *index += 1;
    let Some(value) = args.get(*index) else {
        anyhow::bail!("{flag} requires a value");
    };
    if value.trim().is_empty() {
        anyhow::bail!("{flag} cannot be empty");
    }
    Ok(value.trim().to_string())
}

fn parse_date(value: &str) -> anyhow::Result<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format)
        .map_err(|_| anyhow::anyhow!("expected date as yyyy-mm-dd, got {value}"))
}

fn print_leaderboard(core: &mut RewindCore, args: &CliArgs) -> anyhow::Result<()> {
    let scores = core.leaderboard();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
        return Ok(());
    }

    if scores.is_empty() {
        println!("Not enough listening data for a leaderboard.");
        return Ok(());
    }

    println!("{:>4}  {:>6}  {:>9}  Track", "#", "Points", "Minutes");
    for (position, score) in scores.iter().enumerate() {
        println!(
            "{:>4}  {:>6}  {:>9.1}  {}",
            position + 1,
            score.total_points,
            score.total_minutes,
            score.track
        );
    }
    Ok(())
}

fn print_records(core: &mut RewindCore, args: &CliArgs) -> anyhow::Result<()> {
    let book = core.record_book();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&book)?);
        return Ok(());
    }

    if book.is_empty() {
        println!("Not enough listening data for records.");
        return Ok(());
    }

    for record in book {
        println!("{}: {} ({})", record.title, record.holders.join(", "), record.value);
    }
    Ok(())
}

fn print_summary(core: &mut RewindCore, args: &CliArgs) -> anyhow::Result<()> {
    let stats = core.summary();
    let streaks = core.day_streaks();
    let hour_streak = core.hour_streak();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "summary": stats,
                "day_streaks": streaks,
                "longest_hour_streak": hour_streak,
            }))?
        );
        return Ok(());
    }

    println!("Total listening: {:.1} h ({:.0} min)", stats.total_hours, stats.total_minutes);
    println!(
        "Unique tracks/albums/artists: {} / {} / {}",
        stats.unique_tracks, stats.unique_albums, stats.unique_artists
    );
    println!(
        "Active days/weeks/months/years: {} / {} / {} / {}",
        stats.listening_days, stats.listening_weeks, stats.listening_months, stats.listening_years
    );
    if let Some((track, minutes)) = &stats.most_played_track {
        println!("Most played track: {track} ({minutes:.0} min)");
    }
    if let Some((artist, minutes)) = &stats.most_played_artist {
        println!("Most played artist: {artist} ({minutes:.0} min)");
    }
    if let Some((album, minutes)) = &stats.most_played_album {
        println!("Most played album: {album} ({minutes:.0} min)");
    }
    println!(
        "Longest listening streak: {} days (longest silence: {} days)",
        streaks.longest_listening_streak, streaks.longest_silent_streak
    );
    println!("Longest run of consecutive listening hours: {hour_streak}");
    println!(
        "Average minutes per day: {:.1} on listening days, {:.1} overall",
        streaks.avg_minutes_on_listening_days, streaks.avg_minutes_across_all_days
    );
    Ok(())
}

fn print_top(core: &mut RewindCore, args: &CliArgs) -> anyhow::Result<()> {
    let tracks = core.top_tracks(args.top);
    let artists = core.top_artists(args.top);
    let albums = core.top_albums(args.top);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "tracks": tracks,
                "artists": artists,
                "albums": albums,
            }))?
        );
        return Ok(());
    }

    println!("Top tracks:");
    for row in &tracks {
        println!(
            "  {:>9.1} min  {} — {}",
            row.minutes,
            row.track,
            row.artist.as_deref().unwrap_or("?")
        );
    }
    println!("Top artists:");
    for row in &artists {
        println!(
            "  {:>9.1} min  {} ({} tracks)",
            row.minutes, row.artist, row.unique_tracks
        );
    }
    println!("Top albums:");
    for row in &albums {
        println!(
            "  {:>9.1} min  {} — {}",
            row.minutes,
            row.album,
            row.artist.as_deref().unwrap_or("?")
        );
    }
    Ok(())
}

fn print_week(core: &mut RewindCore, args: &CliArgs) -> anyhow::Result<()> {
    let Some(week) = args.week else {
        anyhow::bail!("--week requires a week id");
    };

    let chart = core.week_chart(week);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    if chart.is_empty() {
        println!("No chart for {week}.");
        return Ok(());
    }

    println!("Chart for {week}:");
    for entry in chart {
        println!(
            "  #{:<2} {:>6} pts  {:>8.1} min  {} — {}",
            entry.rank,
            entry.points,
            entry.minutes,
            entry.track,
            entry.artist.as_deref().unwrap_or("?")
        );
    }
    Ok(())
}

fn print_history(core: &mut RewindCore, args: &CliArgs) -> anyhow::Result<()> {
    let Some(track) = &args.track else {
        anyhow::bail!("--history requires a track name");
    };

    let history = core.track_history(track);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if history.is_empty() {
        println!("{track} never charted in the selected period.");
        return Ok(());
    }

    println!("Chart history for {track}:");
    for entry in history {
        println!(
            "  {}  #{:<2} {:>6} pts  {:>8.1} min",
            entry.week_id, entry.rank, entry.points, entry.minutes
        );
    }
    Ok(())
}

fn print_help() {
    println!("rewind - streaming history analytics");
    println!("  --data <dir>      Extracted export directory (required)");
    println!("  --from <date>     Keep events on or after yyyy-mm-dd");
    println!("  --to <date>       Keep events on or before yyyy-mm-dd");
    println!("  --artist <name>   Keep events by artist (repeatable)");
    println!("  --album <name>    Keep events from album (repeatable)");
    println!("  --track <name>    Keep events for track (repeatable)");
    println!("  --leaderboard     Show the all-time points leaderboard (default)");
    println!("  --records         Show the all-time record book");
    println!("  --summary         Show summary statistics and day streaks");
    println!("  --top <n>         Show top tracks/artists/albums");
    println!("  --week <id>       Show one week's chart, e.g. 2024-W07");
    println!("  --history <name>  Show a track's full chart history");
    println!("  --json            Emit JSON instead of tables");
}
