//! HTML fragments for the dashboard, driven purely by the structured
//! resolver entries. The markup mirrors what the dashboard cards expect;
//! everything here is presentation only.

use crate::{
    datetime,
    resolvers::{
        event::NextEvent,
        live_timing::LiveRow,
        sessions::{SessionEntry, SessionKind},
        standings::RiderEntry,
        teams::TeamEntry,
    },
};
use chrono::FixedOffset;

const TABLE_OPEN: &str =
    "<table style='width:100%; border-collapse:collapse; text-align:center;'>";
const HEAD_ROW_OPEN: &str = "<thead><tr style='background:#222; color:#fff;'>";

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn podium_tint(position: u32) -> &'static str {
    match position {
        1 => "#ffd70044",
        2 => "#c0c0c044",
        3 => "#cd7f3244",
        _ => "transparent",
    }
}

fn kind_color(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Fp => "#00bcd444",
        SessionKind::Pr => "#2196f344",
        SessionKind::Q => "#9c27b044",
        SessionKind::Spr => "#ff980044",
        SessionKind::Rac => "#f4433644",
    }
}

fn flag_img(country_code: &str) -> String {
    if country_code.is_empty() {
        return String::new();
    }
    format!(
        "<img src='https://flagcdn.com/24x18/{}.png' style='vertical-align:middle;'>",
        escape(country_code)
    )
}

pub fn standings_table(entries: &[RiderEntry]) -> String {
    let mut table = vec![
        TABLE_OPEN.to_string(),
        HEAD_ROW_OPEN.to_string(),
        "<th style='padding:4px;'>Pos</th>".to_string(),
        "<th style='padding:4px;'>Flag</th>".to_string(),
        "<th style='padding:4px;'>Rider</th>".to_string(),
        "<th style='padding:4px;'>Team</th>".to_string(),
        "<th style='padding:4px;'>Points</th>".to_string(),
        "<th style='padding:4px;'>Wins</th>".to_string(),
        "<th style='padding:4px;'>Podiums</th>".to_string(),
        "</tr></thead><tbody>".to_string(),
    ];
    for entry in entries {
        table.push(format!(
            "<tr style='background:{tint}; border-bottom:1px solid #555;'>\
             <td style='padding:4px;'>{pos}</td>\
             <td style='padding:4px;'>{flag}</td>\
             <td style='padding:4px; text-align:left;'>{rider}</td>\
             <td style='padding:4px; text-align:left;'>{team}</td>\
             <td style='padding:4px;'>{points}</td>\
             <td style='padding:4px;'>{wins}</td>\
             <td style='padding:4px;'>{podiums}</td></tr>",
            tint = podium_tint(entry.position),
            pos = entry.position,
            flag = flag_img(&entry.country_code),
            rider = escape(&entry.rider_name),
            team = escape(&entry.team_name),
            points = entry.points,
            wins = entry.wins,
            podiums = entry.podiums,
        ));
    }
    table.push("</tbody></table>".to_string());
    table.join("\n")
}

pub fn teams_table(entries: &[TeamEntry]) -> String {
    let mut table = vec![
        TABLE_OPEN.to_string(),
        HEAD_ROW_OPEN.to_string(),
        "<th style='padding:4px;'>Pos</th>".to_string(),
        "<th style='padding:4px;'>Team</th>".to_string(),
        "<th style='padding:4px;'>Points</th>".to_string(),
        "</tr></thead><tbody>".to_string(),
    ];
    for (index, entry) in entries.iter().enumerate() {
        let position = index as u32 + 1;
        table.push(format!(
            "<tr style='background:{tint}; border-bottom:1px solid #555;'>\
             <td style='padding:4px;'>{position}</td>\
             <td style='padding:4px; text-align:left;'>{team}</td>\
             <td style='padding:4px;'>{points}</td></tr>",
            tint = podium_tint(position),
            team = escape(&entry.team_name),
            points = entry.points,
        ));
    }
    table.push("</tbody></table>".to_string());
    table.join("\n")
}

pub fn event_card(event: &NextEvent, offset: FixedOffset) -> String {
    let flag = if event.country_iso.is_empty() {
        String::new()
    } else {
        format!(
            "<img src='https://flagcdn.com/48x36/{}.png' style='vertical-align:middle;'> ",
            escape(&event.country_iso)
        )
    };
    format!(
        "<div style='text-align:center;'>\
         <h3>🏁 {name}</h3>\
         <p>{flag}{country}</p>\
         <p>📍 {circuit}</p>\
         <p>🗓️ {start} → {end}</p>\
         </div>",
        name = escape(&event.name),
        flag = flag,
        country = escape(&event.country_name),
        circuit = escape(&event.circuit_name),
        start = datetime::to_display(event.date_start, offset),
        end = datetime::to_display(event.date_end, offset),
    )
}

pub fn sessions_table(entries: &[SessionEntry], offset: FixedOffset) -> String {
    let mut table = vec![
        TABLE_OPEN.to_string(),
        HEAD_ROW_OPEN.to_string(),
        "<th style='padding:4px;'>Type</th>".to_string(),
        "<th style='padding:4px;'>Start</th>".to_string(),
        "<th style='padding:4px;'>Status</th>".to_string(),
        "</tr></thead><tbody>".to_string(),
    ];
    for entry in entries {
        table.push(format!(
            "<tr style='background:{color}; border-bottom:1px solid #555;'>\
             <td style='padding:4px; font-weight:bold;'>{label}</td>\
             <td style='padding:4px;'>{start}</td>\
             <td style='padding:4px;'>{status}</td></tr>",
            color = kind_color(entry.kind),
            label = entry.kind.label(),
            start = datetime::to_display(entry.start, offset),
            status = escape(&entry.status),
        ));
    }
    table.push("</tbody></table>".to_string());
    table.join("\n")
}

pub fn live_table(rows: &[LiveRow]) -> String {
    let mut table = vec![
        TABLE_OPEN.to_string(),
        HEAD_ROW_OPEN.to_string(),
        "<th style='padding:4px;'>Pos</th>".to_string(),
        "<th style='padding:4px;'>#</th>".to_string(),
        "<th style='padding:4px;'>Rider</th>".to_string(),
        "<th style='padding:4px;'>Nation</th>".to_string(),
        "<th style='padding:4px;'>Team</th>".to_string(),
        "<th style='padding:4px;'>Bike</th>".to_string(),
        "<th style='padding:4px;'>Gap</th>".to_string(),
        "<th style='padding:4px;'>Laps</th>".to_string(),
        "</tr></thead><tbody>".to_string(),
    ];
    for row in rows {
        let position = row
            .position
            .map(|p| p.to_string())
            .unwrap_or_default();
        let (tint, position, gap) = if row.retired {
            ("#ff000033", "❌".to_string(), "DNF".to_string())
        } else {
            let tint = match row.position {
                Some(1) => "#ffd70044",
                Some(2) => "#c0c0c044",
                Some(3) => "#cd7f3244",
                _ => "transparent",
            };
            (tint, position, row.gap_first.clone())
        };
        let laps = row
            .laps
            .map(|l| l.to_string())
            .unwrap_or_else(|| "—".to_string());
        table.push(format!(
            "<tr style='background:{tint}; border-bottom:1px solid #555;'>\
             <td style='padding:4px;'>{position}</td>\
             <td style='padding:4px;'>{number}</td>\
             <td style='padding:4px; text-align:left;'>{rider}</td>\
             <td style='padding:4px;'>{nation}</td>\
             <td style='padding:4px; text-align:left;'>{team}</td>\
             <td style='padding:4px;'>{bike}</td>\
             <td style='padding:4px;'>{gap}</td>\
             <td style='padding:4px;'>{laps}</td></tr>",
            number = escape(&row.number),
            rider = escape(&row.rider),
            nation = escape(&row.nation),
            team = escape(&row.team),
            bike = escape(&row.bike),
            gap = escape(&gap),
        ));
    }
    table.push("</tbody></table>".to_string());
    table.join("\n")
}
