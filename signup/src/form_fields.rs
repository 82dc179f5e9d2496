/// Create an enum of focusable form elements that can be cycled through with
/// tab/shift-tab. The first variant listed gets focus first.
#[macro_export]
macro_rules! focus_ring {
    ($name:ident, $first:ident $(, $variant:ident)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub enum $name {
            #[default]
            $first,
            $($variant),*
        }

        impl $name {
            const ELEMENTS: &'static [$name] = &[
                $name::$first,
                $($name::$variant),*
            ];

            fn position(self) -> usize {
                Self::ELEMENTS
                    .iter()
                    .position(|element| *element == self)
                    .unwrap_or_default()
            }

            /// Move focus forward, wrapping around at the end (e.g. with tab)
            fn next(self) -> Self {
                Self::ELEMENTS[(self.position() + 1) % Self::ELEMENTS.len()]
            }

            /// Move focus backward, wrapping around at the start (e.g. with
            /// shift-tab)
            fn prev(self) -> Self {
                Self::ELEMENTS[(self.position() + Self::ELEMENTS.len() - 1) % Self::ELEMENTS.len()]
            }
        }
    };
}
