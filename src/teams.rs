// --- NEW GAME: TEAM PICKERS ---

use web_sys::{Document, HtmlOptionElement, HtmlSelectElement};

use crate::dom;
use crate::error::Result;

pub const HIDDEN_OPTION: &str = "hidden-option";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn name(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Blue => "blue",
        }
    }

    pub fn other(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn picker_selector(self) -> String {
        format!("#create-{}-team .entity-player-picker select", self.name())
    }
}

/// Flags the options of the other team's pickers that must be hidden because
/// the player is already on this team. The empty placeholder always stays.
pub fn hidden_flags<S: AsRef<str>>(chosen: &[S], options: &[S]) -> Vec<bool> {
    options
        .iter()
        .map(|option| {
            let option = option.as_ref();
            !option.is_empty() && chosen.iter().any(|c| c.as_ref() == option)
        })
        .collect()
}

fn hide_taken_players(this: &[HtmlSelectElement], other: &[HtmlSelectElement]) -> Result<()> {
    let chosen: Vec<String> = this.iter().map(|p| p.value()).collect();
    for picker in other {
        let options: Vec<HtmlOptionElement> = dom::elements(&picker.children());
        let values: Vec<String> = options.iter().map(|o| o.value()).collect();
        for (option, hide) in options.iter().zip(hidden_flags(&chosen, &values)) {
            option.class_list().toggle_with_force(HIDDEN_OPTION, hide)?;
        }
    }
    Ok(())
}

fn link_teams(document: &Document, team: Team) -> Result<()> {
    let this: Vec<HtmlSelectElement> = dom::query_all(document, &team.picker_selector())?;
    let other: Vec<HtmlSelectElement> = dom::query_all(document, &team.other().picker_selector())?;
    for picker in &this {
        let this = this.clone();
        let other = other.clone();
        dom::listen(picker, "change", move |_| hide_taken_players(&this, &other))?;
    }
    Ok(())
}

/// Keeps each player on at most one team while a new game is set up.
pub fn ensure_player_on_one_team(document: &Document) -> Result<()> {
    link_teams(document, Team::Red)?;
    link_teams(document, Team::Blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chosen_players_are_hidden_from_the_other_team() {
        let chosen = ["alice", "carol"];
        let options = ["", "alice", "bob", "carol"];
        assert_eq!(hidden_flags(&chosen, &options), vec![false, true, false, true]);
    }

    #[test]
    fn unselected_pickers_do_not_hide_the_placeholder() {
        let chosen = ["", "bob"];
        let options = ["", "alice", "bob"];
        assert_eq!(hidden_flags(&chosen, &options), vec![false, false, true]);
    }

    #[test]
    fn teams_mirror_each_other() {
        assert_eq!(Team::Red.other(), Team::Blue);
        assert_eq!(Team::Blue.other(), Team::Red);
        assert_eq!(
            Team::Blue.picker_selector(),
            "#create-blue-team .entity-player-picker select"
        );
    }
}
