//! Scoped suppression of move-text regeneration.
//!
//! While a guard is alive the session does not overwrite the user's movetext
//! and ignores nested text-edit events. The flag is cleared on drop, so every
//! exit path (including `?`) releases it.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct UpdateFlag(Rc<Cell<bool>>);

impl UpdateFlag {
    pub fn is_suppressed(&self) -> bool {
        self.0.get()
    }

    /// `None` if a guard is already active.
    pub fn engage(&self) -> Option<UpdateGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(UpdateGuard(Rc::clone(&self.0)))
    }
}

#[derive(Debug)]
pub struct UpdateGuard(Rc<Cell<bool>>);

impl Drop for UpdateGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateFlag;

    #[test]
    fn guard_releases_on_drop() {
        let flag = UpdateFlag::default();
        {
            let _guard = flag.engage().expect("first engage should succeed");
            assert!(flag.is_suppressed());
            assert!(flag.engage().is_none());
        }
        assert!(!flag.is_suppressed());
    }

    #[test]
    fn guard_releases_on_early_return() {
        fn fails(flag: &UpdateFlag) -> Result<(), ()> {
            let _guard = flag.engage().ok_or(())?;
            Err(())
        }

        let flag = UpdateFlag::default();
        assert!(fails(&flag).is_err());
        assert!(!flag.is_suppressed());
    }
}
