use dashmap::{DashMap, DashSet};

/// Zone membership: zone -> connections, connection -> zones.
#[derive(Default)]
pub struct Zones {
    zone_to_conns: DashMap<String, DashSet<u64>>,
    conn_to_zones: DashMap<u64, DashSet<String>>,
}

impl Zones {
    pub fn new() -> Self {
        Self {
            zone_to_conns: DashMap::new(),
            conn_to_zones: DashMap::new(),
        }
    }

    /// Returns false if the connection was already a member.
    pub fn join(&self, zone: &str, conn: u64) -> bool {
        let added = self
            .zone_to_conns
            .entry(zone.to_string())
            .or_insert_with(DashSet::new)
            .insert(conn);

        self.conn_to_zones
            .entry(conn)
            .or_insert_with(DashSet::new)
            .insert(zone.to_string());

        added
    }

    /// Returns false if the connection was not a member.
    pub fn leave(&self, zone: &str, conn: u64) -> bool {
        let removed = self
            .zone_to_conns
            .get(zone)
            .map(|set| set.remove(&conn).is_some())
            .unwrap_or(false);
        // only drop the zone if it is still empty under the shard lock
        self.zone_to_conns.remove_if(zone, |_, set| set.is_empty());

        if let Some(set) = self.conn_to_zones.get(&conn) {
            set.remove(zone);
        }
        self.conn_to_zones.remove_if(&conn, |_, set| set.is_empty());
        removed
    }

    pub fn is_member(&self, zone: &str, conn: u64) -> bool {
        self.zone_to_conns
            .get(zone)
            .map(|set| set.contains(&conn))
            .unwrap_or(false)
    }

    /// Member connection ids, ascending.
    pub fn members(&self, zone: &str) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .zone_to_conns
            .get(zone)
            .map(|set| set.iter().map(|c| *c.key()).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    pub fn cleanup_connection(&self, conn: u64) {
        if let Some((_, zones)) = self.conn_to_zones.remove(&conn) {
            for z in zones.iter() {
                let zone = z.key();
                if let Some(set) = self.zone_to_conns.get(zone) {
                    set.remove(&conn);
                }
                self.zone_to_conns.remove_if(zone, |_, set| set.is_empty());
            }
        }
    }
}
