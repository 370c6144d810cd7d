use slotmap::new_key_type;

new_key_type! {
    /// Identifies a robot on the warehouse floor.
    pub struct RobotId;

    /// Identifies a carton on the warehouse floor.
    pub struct CartonId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn ids_are_stable_across_inserts() {
        let mut robots: SlotMap<RobotId, u32> = SlotMap::with_key();
        let a = robots.insert(1);
        let b = robots.insert(2);
        assert_ne!(a, b);
        assert_eq!(robots[a], 1);
        assert_eq!(robots[b], 2);
    }

    #[test]
    fn removed_ids_do_not_resolve() {
        let mut cartons: SlotMap<CartonId, u32> = SlotMap::with_key();
        let a = cartons.insert(7);
        cartons.remove(a);
        assert!(cartons.get(a).is_none());
    }
}
