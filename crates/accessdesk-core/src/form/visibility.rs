//! Visibility section: everyone, or a picked list of groups and users.
//!
//! Picked rows may be unfilled placeholders (`None`) while the user is still
//! choosing. Switching visibility never clears the rows; they are simply left
//! out of the payload while the policy is visible to everyone. Object lists
//! only carry complete records; id lists carry every filled row.

use std::fmt;
use std::str::FromStr;

use crate::model::{Group, Policy, User};

use super::{PolicyForm, list_shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Everyone,
    Specific,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Everyone => "everyone",
            Self::Specific => "specific",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "everyone" => Ok(Self::Everyone),
            "specific" => Ok(Self::Specific),
            other => Err(format!(
                "unknown visibility \"{other}\" (expected everyone or specific)"
            )),
        }
    }
}

impl PolicyForm {
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        if self.editable() {
            self.visibility = visibility;
        }
    }

    pub fn selected_groups(&self) -> &[Option<Group>] {
        &self.selected_groups
    }

    pub fn selected_users(&self) -> &[Option<User>] {
        &self.selected_users
    }

    /// Appends an empty group row.
    pub fn add_group_row(&mut self) {
        if self.editable() {
            self.selected_groups.push(None);
        }
    }

    pub fn remove_group_row(&mut self, index: usize) {
        if self.editable() && index < self.selected_groups.len() {
            self.selected_groups.remove(index);
        }
    }

    /// Fills a group row from the reference list; unknown ids leave the row unchanged.
    pub fn select_group(&mut self, index: usize, group_id: &str) {
        if !self.editable() {
            return;
        }
        let Some(group) = self.all_groups.iter().find(|g| g.id == group_id).cloned() else {
            return;
        };
        if let Some(row) = self.selected_groups.get_mut(index) {
            *row = Some(group);
        }
    }

    /// Appends an empty user row.
    pub fn add_user_row(&mut self) {
        if self.editable() {
            self.selected_users.push(None);
        }
    }

    pub fn remove_user_row(&mut self, index: usize) {
        if self.editable() && index < self.selected_users.len() {
            self.selected_users.remove(index);
        }
    }

    /// Fills a user row from the reference list; unknown ids leave the row unchanged.
    pub fn select_user(&mut self, index: usize, user_id: &str) {
        if !self.editable() {
            return;
        }
        let Some(user) = self.all_users.iter().find(|u| u.id == user_id).cloned() else {
            return;
        };
        if let Some(row) = self.selected_users.get_mut(index) {
            *row = Some(user);
        }
    }

    /// Replaces rows known only by id with the full reference record.
    pub(super) fn hydrate_selections(&mut self) {
        for row in self.selected_groups.iter_mut().flatten() {
            if !row.is_complete() {
                if let Some(found) = self.all_groups.iter().find(|g| g.id == row.id) {
                    *row = found.clone();
                }
            }
        }
        for row in self.selected_users.iter_mut().flatten() {
            if !row.is_complete() {
                if let Some(found) = self.all_users.iter().find(|u| u.id == row.id) {
                    *row = found.clone();
                }
            }
        }
    }

    pub(super) fn apply_visibility(&self, policy: &mut Policy) {
        policy.visible_to_everyone = self.visibility == Visibility::Everyone;
        if policy.visible_to_everyone {
            if self.carried(|p| p.visible_to_everyone) != Some(true) {
                policy.visible_groups = None;
                policy.visible_users = None;
                policy.visible_group_ids = None;
                policy.visible_user_ids = None;
            }
            return;
        }

        let groups: Vec<&Group> = self
            .selected_groups
            .iter()
            .flatten()
            .filter(|g| !g.id.is_empty())
            .collect();
        let (objects, ids) = list_shape(
            self.carried(|p| (p.visible_groups.is_some(), p.visible_group_ids.is_some())),
            !groups.is_empty(),
        );
        policy.visible_groups = objects.then(|| {
            groups
                .iter()
                .filter(|g| g.is_complete())
                .map(|&g| g.clone())
                .collect()
        });
        policy.visible_group_ids = ids.then(|| groups.iter().map(|g| g.id.clone()).collect());

        let users: Vec<&User> = self
            .selected_users
            .iter()
            .flatten()
            .filter(|u| !u.id.is_empty())
            .collect();
        let (objects, ids) = list_shape(
            self.carried(|p| (p.visible_users.is_some(), p.visible_user_ids.is_some())),
            !users.is_empty(),
        );
        policy.visible_users = objects.then(|| {
            users
                .iter()
                .filter(|u| u.is_complete())
                .map(|&u| u.clone())
                .collect()
        });
        policy.visible_user_ids = ids.then(|| users.iter().map(|u| u.id.clone()).collect());
    }
}
