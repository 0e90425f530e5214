//! RAM table of bonded hosts.
//!
//! Besides whatever pairing data the BLE stack hands over (`P`), each bond
//! keeps the host's GATT system attributes (CCCD states) from the end of its
//! last session, plus whether it was subscribed to input reports. A bonded
//! host does not rewrite its CCCDs after reconnecting, so both must be put
//! back before it can receive key presses again.

use heapless::Vec;

/// Largest system-attribute blob kept per host.
pub const SYS_ATTRS_CAPACITY: usize = 64;

/// Why a session could not be stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveError {
    /// The link belongs to a host without a bond.
    UnknownPeer,
    /// The blob exceeds [`SYS_ATTRS_CAPACITY`]; the stale one was dropped.
    TooLarge,
}

pub struct Bond<P> {
    pub peer: P,
    sys_attrs: Vec<u8, SYS_ATTRS_CAPACITY>,
    subscribed: bool,
}

impl<P> Bond<P> {
    /// System attributes saved at the end of the last session, if any.
    pub fn sys_attrs(&self) -> Option<&[u8]> {
        (!self.sys_attrs.is_empty()).then_some(self.sys_attrs.as_slice())
    }

    /// The host was subscribed to input reports when it last disconnected.
    pub fn subscribed(&self) -> bool {
        self.subscribed
    }
}

/// Up to `N` bonds, oldest first.
pub struct BondTable<P, const N: usize> {
    bonds: Vec<Bond<P>, N>,
}

impl<P, const N: usize> Default for BondTable<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, const N: usize> BondTable<P, N> {
    pub const fn new() -> Self {
        Self { bonds: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Store a fresh bond.
    ///
    /// A bond for the same host (`same(existing, new)`) is replaced and its
    /// saved session forgotten. When the table is full the oldest bond is
    /// evicted.
    pub fn bond(&mut self, peer: P, same: impl Fn(&P, &P) -> bool) {
        if let Some(pos) = self.bonds.iter().position(|b| same(&b.peer, &peer)) {
            self.bonds.remove(pos);
        } else if self.bonds.is_full() && !self.bonds.is_empty() {
            self.bonds.remove(0);
        }

        let _ = self.bonds.push(Bond {
            peer,
            sys_attrs: Vec::new(),
            subscribed: false,
        });
    }

    pub fn find(&self, pred: impl Fn(&P) -> bool) -> Option<&Bond<P>> {
        self.bonds.iter().find(|b| pred(&b.peer))
    }

    /// Remember the session state of the bonded host matching `pred`.
    pub fn save_session(
        &mut self,
        pred: impl Fn(&P) -> bool,
        sys_attrs: &[u8],
        subscribed: bool,
    ) -> Result<(), SaveError> {
        let bond = self
            .bonds
            .iter_mut()
            .find(|b| pred(&b.peer))
            .ok_or(SaveError::UnknownPeer)?;

        match Vec::from_slice(sys_attrs) {
            Ok(attrs) => {
                bond.sys_attrs = attrs;
                bond.subscribed = subscribed;
                Ok(())
            }
            Err(()) => {
                bond.sys_attrs.clear();
                bond.subscribed = false;
                Err(SaveError::TooLarge)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (host id, key)
    type Peer = (u8, u32);

    fn same_host(a: &Peer, b: &Peer) -> bool {
        a.0 == b.0
    }

    fn table() -> BondTable<Peer, 2> {
        BondTable::new()
    }

    #[test]
    fn reconnecting_host_gets_its_subscription_back() {
        let mut t = table();
        t.bond((1, 0xAAAA), same_host);
        assert_eq!(t.save_session(|p| p.0 == 1, &[0x10, 0x00, 0x02, 0x00, 0x01, 0x00], true), Ok(()));

        let bond = t.find(|p| p.0 == 1).expect("bonded");
        assert_eq!(bond.sys_attrs(), Some(&[0x10, 0x00, 0x02, 0x00, 0x01, 0x00][..]));
        assert!(bond.subscribed());
    }

    #[test]
    fn fresh_bond_has_no_session() {
        let mut t = table();
        t.bond((1, 0xAAAA), same_host);
        let bond = t.find(|p| p.0 == 1).expect("bonded");
        assert_eq!(bond.sys_attrs(), None);
        assert!(!bond.subscribed());
    }

    #[test]
    fn unbonded_host_session_is_not_kept() {
        let mut t = table();
        t.bond((1, 0xAAAA), same_host);
        assert_eq!(t.save_session(|p| p.0 == 2, &[1, 2], true), Err(SaveError::UnknownPeer));
        assert!(t.find(|p| p.0 == 2).is_none());
    }

    #[test]
    fn rebonding_replaces_keys_and_forgets_session() {
        let mut t = table();
        t.bond((1, 0xAAAA), same_host);
        t.save_session(|p| p.0 == 1, &[1, 2, 3], true).expect("saved");

        t.bond((1, 0xBBBB), same_host);

        assert_eq!(t.len(), 1);
        let bond = t.find(|p| p.0 == 1).expect("bonded");
        assert_eq!(bond.peer.1, 0xBBBB);
        assert_eq!(bond.sys_attrs(), None);
        assert!(!bond.subscribed());
    }

    #[test]
    fn full_table_evicts_oldest() {
        let mut t = table();
        t.bond((1, 0), same_host);
        t.bond((2, 0), same_host);
        t.bond((3, 0), same_host);

        assert_eq!(t.len(), 2);
        assert!(t.find(|p| p.0 == 1).is_none());
        assert!(t.find(|p| p.0 == 2).is_some());
        assert!(t.find(|p| p.0 == 3).is_some());
    }

    #[test]
    fn oversized_session_drops_stale_state() {
        let mut t = table();
        t.bond((1, 0), same_host);
        t.save_session(|p| p.0 == 1, &[7; 4], true).expect("saved");

        let blob = [0u8; SYS_ATTRS_CAPACITY + 1];
        assert_eq!(t.save_session(|p| p.0 == 1, &blob, true), Err(SaveError::TooLarge));

        let bond = t.find(|p| p.0 == 1).expect("bonded");
        assert_eq!(bond.sys_attrs(), None);
        assert!(!bond.subscribed());
    }
}
