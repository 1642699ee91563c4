//! Connectivity oracle: which copper of a net is still unrouted
//!
//! [`BoardConnectivity`] groups touching copper of each net into clusters
//! with a union-find, then links the clusters of a net with a minimum
//! spanning tree over their closest anchor points. Every tree edge is a
//! ratsnest edge with no routed connection.

use std::collections::BTreeMap;

use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, ItemRef, LayerSet, TrackItem};
use crate::geometry::polygon::{areas_intersect, distance_to_point};
use crate::geometry::{Point, Shape, EPSILON};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatsnestEdge {
    pub net: i32,
    pub source: ItemRef,
    pub source_position: Point,
    pub target: ItemRef,
    pub target_position: Point,
}

/// Connectivity facts the checks rely on without deriving them
pub trait ConnectivityOracle {
    /// Ratsnest edges not covered by routed copper, in a stable order.
    fn unconnected_edges(&self, board: &Board) -> Vec<RatsnestEdge>;

    /// Number of pads on `net`.
    fn pad_count(&self, board: &Board, net: i32) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoardConnectivity;

enum Node {
    Copper {
        item: ItemRef,
        layers: LayerSet,
        shape: Shape,
        anchors: Vec<Point>,
    },
    Zone {
        layers: LayerSet,
        polygon: geo::Polygon<f64>,
    },
}

impl Node {
    fn layers(&self) -> LayerSet {
        match self {
            Node::Copper { layers, .. } | Node::Zone { layers, .. } => layers.copper(),
        }
    }

    fn touches(&self, other: &Node) -> bool {
        if !self.layers().intersects(&other.layers()) {
            return false;
        }
        match (self, other) {
            (Node::Copper { shape: a, .. }, Node::Copper { shape: b, .. }) => a.distance(b) <= EPSILON,
            (Node::Copper { anchors, .. }, Node::Zone { polygon, .. })
            | (Node::Zone { polygon, .. }, Node::Copper { anchors, .. }) => anchors
                .iter()
                .any(|p| distance_to_point(polygon, *p) <= EPSILON),
            (Node::Zone { polygon: a, .. }, Node::Zone { polygon: b, .. }) => areas_intersect(a, b),
        }
    }
}

fn net_nodes(board: &Board, net: i32) -> Vec<Node> {
    let mut nodes = Vec::new();
    for (item, pad) in board.pads() {
        if pad.net == net && pad.has_copper() {
            nodes.push(Node::Copper {
                item,
                layers: pad.layers,
                shape: pad.shape(),
                anchors: vec![pad.shape_pos()],
            });
        }
    }
    for (i, track) in board.tracks.iter().enumerate() {
        if track.net() != net {
            continue;
        }
        let (item, anchors) = match track {
            TrackItem::Track(t) => (ItemRef::Track(i), vec![t.start, t.end]),
            TrackItem::Via(v) => (ItemRef::Via(i), vec![v.position]),
        };
        nodes.push(Node::Copper {
            item,
            layers: track.layer_set(),
            shape: track.shape(),
            anchors,
        });
    }
    for zone in &board.zones {
        if zone.net == net && !zone.is_keepout() && zone.is_on_copper_layer() {
            nodes.push(Node::Zone {
                layers: zone.layers,
                polygon: zone.polygon(),
            });
        }
    }
    nodes
}

struct Link {
    source: (ItemRef, Point),
    target: (ItemRef, Point),
}

fn closest_link(nodes: &[Node], a: &[usize], b: &[usize]) -> Option<(f64, Link)> {
    let anchors = |cluster: &[usize]| -> Vec<(ItemRef, Point)> {
        cluster
            .iter()
            .filter_map(|i| match &nodes[*i] {
                Node::Copper { item, anchors, .. } => Some(anchors.iter().map(move |p| (*item, *p))),
                Node::Zone { .. } => None,
            })
            .flatten()
            .collect()
    };
    let (from, to) = (anchors(a), anchors(b));
    let mut best: Option<(f64, Link)> = None;
    for s in &from {
        for t in &to {
            let d = s.1.distance(&t.1);
            if best.as_ref().map_or(true, |(bd, _)| d < *bd) {
                best = Some((
                    d,
                    Link {
                        source: *s,
                        target: *t,
                    },
                ));
            }
        }
    }
    best
}

impl ConnectivityOracle for BoardConnectivity {
    fn unconnected_edges(&self, board: &Board) -> Vec<RatsnestEdge> {
        let mut nets: Vec<i32> = board
            .pads()
            .map(|(_, p)| p.net)
            .chain(board.tracks.iter().map(|t| t.net()))
            .filter(|n| *n > 0)
            .collect();
        nets.sort_unstable();
        nets.dedup();

        let mut edges = Vec::new();
        for net in nets {
            let nodes = net_nodes(board, net);
            let mut clusters_uf = UnionFind::<usize>::new(nodes.len());
            for i in 0..nodes.len() {
                for j in (i + 1)..nodes.len() {
                    if nodes[i].touches(&nodes[j]) {
                        clusters_uf.union(i, j);
                    }
                }
            }

            // clusters keyed by their first node, zones alone do not need routing
            let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
            let mut first_of_root: BTreeMap<usize, usize> = BTreeMap::new();
            for i in 0..nodes.len() {
                let root = clusters_uf.find(i);
                let key = *first_of_root.entry(root).or_insert(i);
                clusters.entry(key).or_default().push(i);
            }
            let clusters: Vec<Vec<usize>> = clusters
                .into_values()
                .filter(|c| c.iter().any(|i| matches!(nodes[*i], Node::Copper { .. })))
                .collect();
            if clusters.len() < 2 {
                continue;
            }
            debug!(net, clusters = clusters.len(), "net is split");

            let mut graph = UnGraph::<usize, f64>::new_undirected();
            let indices: Vec<_> = (0..clusters.len()).map(|c| graph.add_node(c)).collect();
            let mut links: BTreeMap<(usize, usize), Link> = BTreeMap::new();
            for a in 0..clusters.len() {
                for b in (a + 1)..clusters.len() {
                    if let Some((d, link)) = closest_link(&nodes, &clusters[a], &clusters[b]) {
                        graph.add_edge(indices[a], indices[b], d);
                        links.insert((a, b), link);
                    }
                }
            }

            for element in min_spanning_tree(&graph) {
                if let Element::Edge { source, target, .. } = element {
                    let key = (source.min(target), source.max(target));
                    if let Some(link) = links.get(&key) {
                        edges.push(RatsnestEdge {
                            net,
                            source: link.source.0,
                            source_position: link.source.1,
                            target: link.target.0,
                            target_position: link.target.1,
                        });
                    }
                }
            }
        }
        edges
    }

    fn pad_count(&self, board: &Board, net: i32) -> usize {
        board.pads().filter(|(_, p)| p.net == net).count()
    }
}
