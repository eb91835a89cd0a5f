//! Terminal ballot and submission results

use chrono::DateTime;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use owo_colors::OwoColorize;
use std::io::{self, Write};

use mnvote_engine::{Action, Session, SubmissionEntry, SubmissionObserver, SubmissionReport, UserIntent};
use mnvote_governance::{PriorVote, Proposal, VoteChoice};

const NAME_WIDTH: usize = 32;

/// Translate a key press into an intent; unbound keys give `None`
pub fn intent_for_key(key: &KeyEvent) -> Option<UserIntent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(UserIntent::CycleUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UserIntent::CycleDown),
        KeyCode::Right | KeyCode::Char('l') => Some(UserIntent::IncreaseChoice),
        KeyCode::Left | KeyCode::Char('h') => Some(UserIntent::DecreaseChoice),
        KeyCode::Enter => Some(UserIntent::Confirm),
        // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(UserIntent::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(UserIntent::Quit),
        _ => None,
    }
}

/// `2024-05-01 12:00:00 UTC`, or the raw number if out of range
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn prior_marker(prior: PriorVote) -> &'static str {
    match prior {
        PriorVote::NotVoted => "",
        PriorVote::Yes => "voted YES",
        PriorVote::No => "voted NO",
    }
}

/// One ballot line without colours
pub fn row_text(proposal: &Proposal) -> String {
    let name = if proposal.name().chars().count() > NAME_WIDTH {
        let cut: String = proposal.name().chars().take(NAME_WIDTH - 1).collect();
        format!("{}…", cut)
    } else {
        proposal.name().to_string()
    };

    format!(
        "{:<width$} {:>6} / {:<6} {:>6}%  {:<9}  [{:^7}]",
        name,
        proposal.yeas(),
        proposal.nays(),
        proposal.metrics().turnout_display(),
        prior_marker(proposal.prior_vote()),
        proposal.choice().label(),
        width = NAME_WIDTH
    )
}

/// Number of votes the confirm row would send
fn pending_votes(session: &Session) -> usize {
    session.ballot().to_submit().count() * session.identities().len()
}

fn line<W: Write>(out: &mut W, text: impl std::fmt::Display) -> io::Result<()> {
    queue!(out, Clear(ClearType::CurrentLine), Print(text), Print("\r\n"))
}

fn draw<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    line(out, "╔══════════════════════════════════════════════════════════════╗".cyan().bold())?;
    line(out, "║              MASTERNODE BUDGET VOTING                        ║".cyan().bold())?;
    line(out, "╚══════════════════════════════════════════════════════════════╝".cyan().bold())?;
    line(
        out,
        format!(
            "  {}: {}   {}: {}",
            "Network masternodes".bright_black(),
            session.ballot().masternode_count(),
            "Voting with".bright_black(),
            session.identities().len()
        ),
    )?;
    line(out, "")?;
    line(
        out,
        format!(
            "  {:<width$} {:>6}   {:<6} {:>7}  {:<9}  {}",
            "Proposal",
            "Yeas",
            "Nays",
            "Turnout",
            "",
            "Vote",
            width = NAME_WIDTH
        )
        .bright_black(),
    )?;

    if session.ballot().is_empty() {
        line(out, format!("  {}", "No open proposals".bright_black()))?;
    }

    for (i, proposal) in session.ballot().list_votable().iter().enumerate() {
        let text = row_text(proposal);
        let text = if proposal.metrics().passing {
            text.green().to_string()
        } else {
            text.red().to_string()
        };
        let text = match proposal.choice() {
            VoteChoice::Abstain => text,
            _ => text.bold().to_string(),
        };

        if i == session.cursor() {
            line(out, format!("{} {}", "▶".cyan().bold(), text.reversed()))?;
        } else {
            line(out, format!("  {}", text))?;
        }
    }

    line(out, "")?;
    let confirm = format!("[ CONFIRM: submit {} vote(s) ]", pending_votes(session));
    if session.on_confirm_row() {
        line(out, format!("{} {}", "▶".cyan().bold(), confirm.yellow().bold().reversed()))?;
    } else {
        line(out, format!("  {}", confirm.yellow()))?;
    }

    line(out, "")?;
    line(
        out,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black(),
    )?;
    line(
        out,
        format!(
            "  {} move   {} change vote   {} submit on CONFIRM   {} quit",
            "↑/↓ j/k".bright_black(),
            "←/→ h/l".bright_black(),
            "Enter".bright_black(),
            "q".bright_black()
        ),
    )?;
    out.flush()
}

fn ballot_loop<W: Write>(out: &mut W, session: &mut Session) -> io::Result<bool> {
    draw(out, session)?;

    loop {
        match event::read()? {
            Event::Key(key) => {
                let Some(intent) = intent_for_key(&key) else {
                    continue;
                };
                match session.apply(intent) {
                    Action::Redraw => draw(out, session)?,
                    Action::Submit => return Ok(true),
                    Action::Quit => return Ok(false),
                    Action::Ignored => {}
                }
            }
            Event::Resize(_, _) => draw(out, session)?,
            _ => {}
        }
    }
}

/// Runs its closure when dropped, including on an early `?` return
struct RestoreOnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}

fn restore_terminal() {
    if let Err(e) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
        log::warn!("Failed to leave the alternate screen: {}", e);
    }
    if let Err(e) = terminal::disable_raw_mode() {
        log::warn!("Failed to disable raw mode: {}", e);
    }
}

/// Show the ballot until the operator confirms (`true`) or quits (`false`)
pub fn run_ballot(session: &mut Session) -> io::Result<bool> {
    let mut stdout = io::stdout();

    terminal::enable_raw_mode()?;
    let _restore = RestoreOnDrop(restore_terminal);
    execute!(stdout, EnterAlternateScreen, Hide)?;

    ballot_loop(&mut stdout, session)
}

/// Prints each vote result as soon as the node answers
#[derive(Debug, Default)]
pub struct ProgressPrinter;

impl SubmissionObserver for ProgressPrinter {
    fn on_proposal(&mut self, proposal: &Proposal) {
        println!();
        println!(
            "{} {} {}",
            "▶".cyan().bold(),
            proposal.name().bold(),
            proposal.choice().label().yellow()
        );
    }

    fn on_entry(&mut self, entry: &SubmissionEntry) {
        let status = if entry.outcome.is_success() {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        println!(
            "  {} {}  {}",
            status,
            entry.funding_reference,
            format_timestamp(entry.timestamp).bright_black()
        );
        if entry.outcome.is_success() {
            println!("      {}", entry.outcome.message());
        } else {
            println!("      {}", entry.outcome.message().red());
        }
    }
}

pub fn render_summary(report: &SubmissionReport) {
    println!();
    println!(
        "{}",
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black()
    );
    println!(
        "  {}: {}   {}: {}",
        "Accepted".bright_black(),
        report.successes().to_string().green().bold(),
        "Failed".bright_black(),
        report.failures().to_string().red().bold()
    );
    if report.cancelled {
        println!(
            "  {} Interrupted, {} vote(s) not sent",
            "⚠".yellow(),
            report.not_attempted
        );
    }
    if report.aborted {
        println!(
            "  {} Entropy source failed, {} vote(s) not sent",
            "✗".red(),
            report.not_attempted
        );
    }
    if report.entries.is_empty() && report.is_complete() {
        println!("  {}", "Nothing to submit: every proposal is ABSTAIN".bright_black());
    }
}
