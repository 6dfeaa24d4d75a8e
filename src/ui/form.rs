//! Check-in form: turns one line of terminal input into a form action.

use crate::models::{CheckInRequest, Team};

/// What a submitted input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormInput {
    Submit(CheckInRequest),
    Clear,
    Quit,
    Blank,
}

/// Parse `name, team[, display name]`, or a `/clear` / `/quit` command.
///
/// Names are not validated. A missing team yields an empty team code, which the
/// store counts as an unknown team.
pub fn parse_line(line: &str) -> FormInput {
    let line = line.trim();
    match line {
        "" => return FormInput::Blank,
        "/clear" => return FormInput::Clear,
        "/quit" | "/exit" => return FormInput::Quit,
        _ => {}
    }

    let mut fields = line.splitn(3, ',').map(str::trim);
    let name = fields.next().unwrap_or_default().to_string();
    let team = fields.next().unwrap_or_default().to_string();
    let team_name = match fields.next().filter(|label| !label.is_empty()) {
        Some(label) => label.to_string(),
        None => default_team_name(&team),
    };

    FormInput::Submit(CheckInRequest {
        name,
        team,
        team_name,
    })
}

fn default_team_name(code: &str) -> String {
    Team::from_code(code)
        .map(|team| team.display_name().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Prompt listing the team codes the form accepts.
pub fn prompt() -> String {
    let teams = Team::ALL
        .iter()
        .map(|team| format!("{} {} ({})", team.icon(), team.code(), team.display_name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Check in with `name, team`. Teams: {}. /clear resets, /quit exits.", teams)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(line: &str) -> CheckInRequest {
        match parse_line(line) {
            FormInput::Submit(request) => request,
            other => panic!("expected submit, got {:?}", other),
        }
    }

    #[test]
    fn test_known_team_gets_form_label() {
        let request = submitted("  Ada Lovelace , power ");
        assert_eq!(request.name, "Ada Lovelace");
        assert_eq!(request.team, "power");
        assert_eq!(request.team_name, "Team Renewables");
    }

    #[test]
    fn test_explicit_label_wins() {
        let request = submitted("Grace, water, Team Water");
        assert_eq!(request.team, "water");
        assert_eq!(request.team_name, "Team Water");
    }

    #[test]
    fn test_unknown_team_uses_code_as_label() {
        let request = submitted("Linus, fire");
        assert_eq!(request.team, "fire");
        assert_eq!(request.team_name, "fire");
    }

    #[test]
    fn test_permissive_inputs() {
        let request = submitted(", zero");
        assert_eq!(request.name, "");
        assert_eq!(request.team_name, "Team Net Zero");

        let request = submitted("Solo");
        assert_eq!(request.name, "Solo");
        assert_eq!(request.team, "");
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_line("   "), FormInput::Blank);
        assert_eq!(parse_line("/clear"), FormInput::Clear);
        assert_eq!(parse_line("/quit\n"), FormInput::Quit);
    }
}
