//! A list of class names, the state that most of the page's behaviours boil down to.

/// An ordered set of class names.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassList {
    /// The names, in the order that they were added.
    names: Vec<String>,
}

impl ClassList {
    /// Instantiate with some initial classes.
    #[must_use]
    pub fn with(names: &[&str]) -> Self {
        let mut list = Self::default();
        for name in names {
            list.add(name);
        }
        list
    }

    /// Add a class. Adding a class that's already there does nothing.
    pub fn add(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_owned());
        }
    }

    /// Remove a class, if it's there.
    pub fn remove(&mut self, name: &str) {
        self.names.retain(|existing| existing != name);
    }

    /// Add the class if it's missing, remove it if it's there. Returns whether the class is now
    /// in the list.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.contains(name) {
            self.remove(name);
            false
        } else {
            self.add(name);
            true
        }
    }

    /// Is the class in the list?
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.names.join(" "))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut classes = ClassList::default();
        classes.add("visible");
        classes.add("visible");
        assert_eq!(classes.to_string(), "visible");
    }

    #[test]
    fn toggle_reports_membership() {
        let mut classes = ClassList::with(&["form-status"]);
        assert!(classes.toggle("light-mode"));
        assert!(classes.contains("light-mode"));
        assert_eq!(classes.to_string(), "form-status light-mode");
        assert!(!classes.toggle("light-mode"));
        assert!(!classes.contains("light-mode"));
    }

    #[test]
    fn removing_a_missing_class_is_fine() {
        let mut classes = ClassList::with(&["a", "b"]);
        classes.remove("c");
        classes.remove("a");
        assert_eq!(classes.to_string(), "b");
    }
}
