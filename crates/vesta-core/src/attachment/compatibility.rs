// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Which usage kinds may overlap on the same attachment inside one scope.
//!
//! The rules are stored as a list of disallowed pairs and folded at compile
//! time into a symmetric bit matrix, so a lookup is a shift and a mask.

use super::ScopeAttachmentUsage::{self, *};

const DISALLOWED_PAIRS: &[(ScopeAttachmentUsage, ScopeAttachmentUsage)] = &[
    (RenderTarget, RenderTarget),
    (RenderTarget, DepthStencil),
    (RenderTarget, Resolve),
    (RenderTarget, ShadingRate),
    (RenderTarget, Predication),
    (RenderTarget, Copy),
    (DepthStencil, DepthStencil),
    (DepthStencil, Predication),
    (DepthStencil, Resolve),
    (DepthStencil, InputAssembly),
    (DepthStencil, ShadingRate),
    (DepthStencil, Copy),
    (Resolve, Resolve),
    (Resolve, Shader),
    (Resolve, SubpassInput),
    (Resolve, Predication),
    (Copy, Copy),
    (Copy, SubpassInput),
    (ShadingRate, ShadingRate),
    (Predication, Predication),
];

const fn build_matrix() -> [u16; ScopeAttachmentUsage::COUNT] {
    let mut rows = [0u16; ScopeAttachmentUsage::COUNT];
    let mut i = 0;
    while i < DISALLOWED_PAIRS.len() {
        let (a, b) = DISALLOWED_PAIRS[i];
        rows[a.index()] |= 1 << b.index();
        rows[b.index()] |= 1 << a.index();
        i += 1;
    }
    rows
}

static CONFLICTS: [u16; ScopeAttachmentUsage::COUNT] = build_matrix();

/// Returns `true` if `a` and `b` may be declared on the same attachment in the same scope.
///
/// The relation is symmetric.
pub fn is_compatible(a: ScopeAttachmentUsage, b: ScopeAttachmentUsage) -> bool {
    CONFLICTS[a.index()] & (1 << b.index()) == 0
}

/// Every disallowed pair, as declared.
pub fn conflicting_pairs() -> &'static [(ScopeAttachmentUsage, ScopeAttachmentUsage)] {
    DISALLOWED_PAIRS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_is_symmetric() {
        for a in ScopeAttachmentUsage::ALL {
            for b in ScopeAttachmentUsage::ALL {
                assert_eq!(
                    is_compatible(a, b),
                    is_compatible(b, a),
                    "{a:?}/{b:?} must be symmetric"
                );
            }
        }
    }

    #[test]
    fn every_declared_pair_conflicts() {
        for &(a, b) in conflicting_pairs() {
            assert!(!is_compatible(a, b));
        }
    }

    #[test]
    fn depth_stencil_rules() {
        for other in [RenderTarget, Predication, Resolve, InputAssembly, ShadingRate] {
            assert!(!is_compatible(DepthStencil, other), "{other:?}");
        }
        assert!(is_compatible(DepthStencil, Shader));
        assert!(is_compatible(DepthStencil, SubpassInput));
    }

    #[test]
    fn render_target_cannot_double_up() {
        assert!(!is_compatible(RenderTarget, RenderTarget));
        assert!(is_compatible(RenderTarget, SubpassInput));
        assert!(is_compatible(RenderTarget, Shader));
    }

    #[test]
    fn shader_reads_mix_freely() {
        assert!(is_compatible(Shader, Shader));
        assert!(is_compatible(Shader, Indirect));
        assert!(is_compatible(Indirect, Indirect));
        assert!(is_compatible(InputAssembly, InputAssembly));
    }
}
