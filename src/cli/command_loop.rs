//! Line-oriented terminal front-end.
//!
//! Reads one command per line, forwards it to the session and prints the
//! resulting movetext, annotation or board. Errors are printed as `alert:`
//! lines; nothing a user types ends the loop except `quit`.

use std::io::{self, BufRead, Write};

use crate::editor::board_widget::{DragStart, DropEvent, DropOutcome, TextBoard, SPARE_SOURCE};
use crate::editor::navigation::Navigation;
use crate::editor::session::SessionState;
use crate::rules_engine::rules_engine::RulesEngine;

const HELP_TEXT: &str = "\
commands:
  fen <FEN>              load a position and start a new line
  drop <from> <to>       move a piece (also: drop e2e4)
  drop <from> offboard   drop a piece off the board
  spare <piece> <square> place a spare piece, e.g. spare wN c3
  drag <square>|spare    pick up a piece
  snap                   redraw after a drop
  moves <movetext>       replace the line with typed movetext
  start|back|forward|end navigate the line
  flip                   flip the board
  board                  draw the board
  copy                   print the annotation
  pgn [result]           print the line as PGN
  help                   show this text
  quit                   leave";

pub type TerminalSession<E> = SessionState<E, TextBoard>;

pub fn run_stdio_loop<E: RulesEngine>(session: &mut TerminalSession<E>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_loop(session, stdin.lock(), &mut stdout)
}

pub fn run_loop<E: RulesEngine>(
    session: &mut TerminalSession<E>,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let should_quit = handle_command(session, &line, out)?;
        out.flush()?;
        if should_quit {
            break;
        }
    }
    Ok(())
}

/// Execute one command line. Returns `true` when the loop should stop.
pub fn handle_command<E: RulesEngine>(
    session: &mut TerminalSession<E>,
    line: &str,
    out: &mut impl Write,
) -> io::Result<bool> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(false);
    }

    let (cmd, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(cmd, rest)| (cmd, rest.trim()));

    match cmd {
        "fen" => match session.load_fen(rest) {
            Ok(()) => print_state(session, out)?,
            Err(err) => writeln!(out, "alert: {err}")?,
        },
        "drop" => match split_drop_args(rest) {
            Some((source, target)) => {
                let piece = session.widget().piece_on(&source).unwrap_or_default();
                let event = DropEvent {
                    source,
                    target,
                    piece,
                };
                report_drop(session, &event, out)?;
            }
            None => writeln!(out, "alert: usage: drop <from> <to>")?,
        },
        "spare" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [piece, target] => {
                let event = DropEvent {
                    source: SPARE_SOURCE.to_owned(),
                    target: (*target).to_owned(),
                    piece: (*piece).to_owned(),
                };
                report_drop(session, &event, out)?;
            }
            _ => writeln!(out, "alert: usage: spare <piece> <square>")?,
        },
        "drag" => {
            let (source, piece) = if rest == SPARE_SOURCE {
                (SPARE_SOURCE.to_owned(), String::new())
            } else {
                (rest.to_owned(), session.widget().piece_on(rest).unwrap_or_default())
            };
            let drag = DragStart {
                source,
                orientation: session.widget().orientation(),
                touch: false,
                piece,
            };
            if session.on_drag_start(&drag) {
                if drag.piece.is_empty() {
                    writeln!(out, "drag allowed")?;
                } else {
                    let image = session.widget().piece_image(&drag.piece);
                    writeln!(out, "drag allowed {} ({image})", drag.piece)?;
                }
            } else {
                writeln!(out, "drag refused")?;
            }
        }
        "snap" => {
            session.on_snap_end();
            writeln!(out, "{}", session.widget().fen())?;
        }
        "moves" => match session.on_moves_text_edited(rest) {
            Ok(()) => print_state(session, out)?,
            Err(err) => writeln!(out, "alert: {err}")?,
        },
        "start" | "back" | "forward" | "end" => {
            let step: Navigation = cmd.parse().map_err(io::Error::other)?;
            match session.navigate(step) {
                Ok(cursor) => {
                    let controls = session.controls();
                    writeln!(
                        out,
                        "position {cursor}/{} [start:{} back:{} forward:{} end:{}]",
                        session.history().len() - 1,
                        on_off(controls.start),
                        on_off(controls.back),
                        on_off(controls.forward),
                        on_off(controls.end),
                    )?;
                    print_state(session, out)?;
                }
                Err(err) => writeln!(out, "alert: {err}")?,
            }
        }
        "flip" => {
            session.flip();
            print_state(session, out)?;
        }
        "board" => {
            writeln!(out, "{}", session.widget().render())?;
            writeln!(out, "{}", session.engine().fen())?;
        }
        "copy" => writeln!(out, "{}", session.copy_output())?,
        "pgn" => {
            let result = if rest.is_empty() { "*" } else { rest };
            write!(out, "{}", session.pgn(result))?;
        }
        "help" => writeln!(out, "{HELP_TEXT}")?,
        "quit" | "exit" => return Ok(true),
        _ => writeln!(out, "alert: unknown command '{cmd}' (try help)")?,
    }

    Ok(false)
}

fn report_drop<E: RulesEngine>(
    session: &mut TerminalSession<E>,
    event: &DropEvent,
    out: &mut impl Write,
) -> io::Result<()> {
    match session.on_drop(event) {
        DropOutcome::Moved(applied) => {
            writeln!(out, "moved {}", applied.san)?;
            print_state(session, out)
        }
        DropOutcome::Edited(fen) => {
            writeln!(out, "edited {fen}")?;
            print_state(session, out)
        }
        DropOutcome::Snapback => {
            writeln!(out, "snapback")?;
            session.on_snap_end();
            Ok(())
        }
    }
}

fn print_state<E: RulesEngine>(session: &TerminalSession<E>, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "moves: {}", session.moves_text())?;
    writeln!(out, "output: {}", session.output())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// `e2 e4` or `e2e4`.
fn split_drop_args(rest: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    match parts.as_slice() {
        [source, target] => Some(((*source).to_owned(), (*target).to_owned())),
        [joined] if joined.len() == 4 && joined.is_ascii() => {
            Some((joined[..2].to_owned(), joined[2..].to_owned()))
        }
        _ => None,
    }
}
