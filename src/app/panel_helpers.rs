//! Utility methods for finding and toggling specific sub-panels.
//!
//! These helpers iterate over the docked panel lists (left, then right) to
//! locate a panel by its concrete type.

use crate::panels::panel_trait::Panel;

use super::MultiCalcPanel;

impl MultiCalcPanel {
    /// The first docked panel of type `T`.
    pub fn panel<T: Panel>(&self) -> Option<&T> {
        self.left_side_panels
            .iter()
            .chain(self.right_side_panels.iter())
            .find_map(|p| p.downcast_ref::<T>())
    }

    /// Mutable access to the first docked panel of type `T`.
    pub fn panel_mut<T: Panel>(&mut self) -> Option<&mut T> {
        self.left_side_panels
            .iter_mut()
            .chain(self.right_side_panels.iter_mut())
            .find_map(|p| p.downcast_mut::<T>())
    }

    /// Make the panel of type `T` the active tab of its dock, or hide it if it
    /// already is.
    ///
    /// Returns `true` if a matching panel was found.
    pub fn toggle_panel_visibility<T: Panel>(&mut self) -> bool {
        for list in [&mut self.left_side_panels, &mut self.right_side_panels] {
            let Some(idx) = list.iter().position(|p| p.is::<T>()) else {
                continue;
            };
            let st = *list[idx].state();
            let currently_shown = st.visible && !st.detached;
            for (i, p) in list.iter_mut().enumerate() {
                let st = p.state_mut();
                if i == idx {
                    st.visible = !currently_shown;
                    st.detached = false;
                } else if !st.detached && !currently_shown {
                    st.visible = false;
                }
            }
            return true;
        }
        false
    }
}
