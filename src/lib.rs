/*!

Cycle-accurate router and flow-control engine for a tiled multi-core
interconnect.

A [`network_node::NetworkNode`] owns one [`router_performance::RouterPerformanceModel`]
per router plus its outbound [`link::LinkPerformanceModel`]s, and turns a stream
of incoming [`packet::NetPacket`]s (carrying either a data [`flit::Flit`] or a
[`buffer_management_msg::BufferManagementMsg`]) into the packets that must be
delivered to neighboring routers, advancing simulated time as it goes. The
flow-control scheme itself (store-and-forward, virtual cut-through, wormhole,
or the wormhole/VCT-broadcast hybrid) is pluggable via the
[`flow_control::FlowControlScheme`] trait; concrete schemes live under
[`flow_control`].

*/

pub mod error;
pub mod quantify;
pub mod channel;
pub mod packet;
pub mod flit;
pub mod buffer_management_msg;
pub mod buffer_model;
pub mod buffer_status;
pub mod flow_control;
pub mod router_performance;
pub mod link;
pub mod network_node;
pub mod config;

pub use channel::{Endpoint, EndpointRoute, RouterId, ChannelOwner};
pub use packet::{NetPacket, Payload, PacketType};
pub use flit::Flit;
pub use buffer_management_msg::BufferManagementMsg;
pub use buffer_model::BufferModel;
pub use buffer_status::{BufferStatus, BufferStatusList};
pub use flow_control::{FlowControlScheme, FlowControlSchemeKind, EngineOutput};
pub use router_performance::RouterPerformanceModel;
pub use link::{LinkPerformanceModel, LinkPowerModel, FixedDelayLink, LinearLinkPowerModel};
pub use network_node::{NetworkNode, RouterPowerModel, TopologyResolver, RemoteRouterInfo};
pub use config::{ChannelConfig, RouterPerformanceModelConfig, NodeConfig};
pub use error::{Error, ErrorKind};
