//! Shared fixture items for the model tests.

#![allow(dead_code)]

use std::any::Any;

use nethome_core::value::Value;
use nethome_model::{CapabilityTable, HomeItem, ItemError, ItemInstance};

/// A lamp fixture covering the attribute semantics:
/// readable/writable, init-only, write-only, validated, and unbound.
pub struct TestLamp {
    pub state: bool,
    pub room: String,
    pub brightness: i64,
    pub secret: String,
    pub toggles: u32,
}

pub const LAMP_MODEL: &str = r#"
<HomeItem Class="TestLamp" Category="Lamps">
  <Attribute Name="State" Type="Boolean" Get="getState" Set="setState" Default="true"/>
  <Attribute Name="Room" Type="String" Get="getRoom" Init="initRoom"/>
  <Attribute Name="Brightness" Type="Integer" Get="getBrightness" Set="setBrightness"/>
  <Attribute Name="Secret" Type="String" Set="setSecret"/>
  <Attribute Name="Hidden" Type="String" Get="getHidden"/>
  <Action Name="Toggle" Method="toggle" Default="true"/>
  <Action Name="Fail" Method="failAction"/>
  <Action Name="Ghost" Method="missingMethod"/>
</HomeItem>"#;

impl Default for TestLamp {
    fn default() -> Self {
        Self {
            state: false,
            room: String::new(),
            brightness: 50,
            secret: String::new(),
            toggles: 0,
        }
    }
}

impl HomeItem for TestLamp {
    fn model_xml(&self) -> &str {
        LAMP_MODEL
    }

    fn capabilities(&self) -> CapabilityTable {
        let mut table = CapabilityTable::new();
        table
            .getter::<TestLamp>("getState", |lamp| Value::Boolean(lamp.state))
            .setter::<TestLamp>("setState", |lamp, value| {
                lamp.state = value
                    .as_bool()
                    .ok_or_else(|| ItemError::illegal_value("State", value.marshal()))?;
                Ok(())
            })
            .getter::<TestLamp>("getRoom", |lamp| Value::Text(lamp.room.clone()))
            .initializer::<TestLamp>("initRoom", |lamp, value| {
                lamp.room = value.marshal();
                Ok(())
            })
            .getter::<TestLamp>("getBrightness", |lamp| Value::Integer(lamp.brightness))
            .setter::<TestLamp>("setBrightness", |lamp, value| {
                match value.as_i64() {
                    Some(level) if (0..=100).contains(&level) => {
                        lamp.brightness = level;
                        Ok(())
                    }
                    _ => Err(ItemError::illegal_value("Brightness", value.marshal())),
                }
            })
            .setter::<TestLamp>("setSecret", |lamp, value| {
                lamp.secret = value.marshal();
                Ok(())
            })
            // "getHidden" deliberately not registered: the model declares it
            // but the binding must reject it.
            .action::<TestLamp>("toggle", |lamp| {
                lamp.state = !lamp.state;
                lamp.toggles += 1;
                Ok(if lamp.state { "On" } else { "Off" }.to_string())
            })
            .action::<TestLamp>("failAction", |_| {
                Err(ItemError::execution_failure("Fail", "hardware unreachable"))
            });
        table
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A morphing sensor whose model gains a second attribute when logging is
/// switched on. The version counter bumps with every model change.
pub struct MorphingSensor {
    pub value: i64,
    pub log_file: String,
    pub logging: bool,
    pub version: u32,
}

pub const SENSOR_BASE_MODEL: &str = r#"
<HomeItem Class="MorphingSensor" Category="Thermometers" Morphing="true">
  <Attribute Name="Value" Type="Integer" Get="getValue" Default="true"/>
  <Attribute Name="Logging" Type="Boolean" Get="getLogging" Set="setLogging"/>
</HomeItem>"#;

pub const SENSOR_LOGGING_MODEL: &str = r#"
<HomeItem Class="MorphingSensor" Category="Thermometers" Morphing="true">
  <Attribute Name="Value" Type="Integer" Get="getValue" Default="true"/>
  <Attribute Name="Logging" Type="Boolean" Get="getLogging" Set="setLogging"/>
  <Attribute Name="LogFile" Type="String" Get="getLogFile" Set="setLogFile"/>
</HomeItem>"#;

impl Default for MorphingSensor {
    fn default() -> Self {
        Self {
            value: 0,
            log_file: String::new(),
            logging: false,
            version: 0,
        }
    }
}

impl MorphingSensor {
    pub fn set_logging(&mut self, logging: bool) {
        if self.logging != logging {
            self.logging = logging;
            self.version += 1;
        }
    }
}

impl HomeItem for MorphingSensor {
    fn model_xml(&self) -> &str {
        if self.logging {
            SENSOR_LOGGING_MODEL
        } else {
            SENSOR_BASE_MODEL
        }
    }

    fn model_version(&self) -> u32 {
        self.version
    }

    fn capabilities(&self) -> CapabilityTable {
        let mut table = CapabilityTable::new();
        table
            .getter::<MorphingSensor>("getValue", |sensor| Value::Integer(sensor.value))
            .getter::<MorphingSensor>("getLogging", |sensor| Value::Boolean(sensor.logging))
            .setter::<MorphingSensor>("setLogging", |sensor, value| {
                let logging = value
                    .as_bool()
                    .ok_or_else(|| ItemError::illegal_value("Logging", value.marshal()))?;
                sensor.set_logging(logging);
                Ok(())
            })
            .getter::<MorphingSensor>("getLogFile", |sensor| Value::Text(sensor.log_file.clone()))
            .setter::<MorphingSensor>("setLogFile", |sensor, value| {
                sensor.log_file = value.marshal();
                Ok(())
            });
        table
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A fixture with every relation-typed attribute kind.
#[derive(Default)]
pub struct Wiring {
    pub target: String,
    pub members: Vec<String>,
    pub on_command: String,
}

pub const WIRING_MODEL: &str = r#"
<HomeItem Class="Wiring" Category="Controls">
  <Attribute Name="Target" Type="Item" Get="getTarget" Set="setTarget"/>
  <Attribute Name="Members" Type="Items" Get="getMembers" Set="setMembers"/>
  <Attribute Name="OnCommand" Type="Command" Get="getOnCommand" Set="setOnCommand"/>
</HomeItem>"#;

impl HomeItem for Wiring {
    fn model_xml(&self) -> &str {
        WIRING_MODEL
    }

    fn capabilities(&self) -> CapabilityTable {
        let mut table = CapabilityTable::new();
        table
            .getter::<Wiring>("getTarget", |w| Value::Text(w.target.clone()))
            .setter::<Wiring>("setTarget", |w, value| {
                w.target = value.marshal();
                Ok(())
            })
            .getter::<Wiring>("getMembers", |w| Value::List(w.members.clone()))
            .setter::<Wiring>("setMembers", |w, value| {
                w.members = value
                    .as_list()
                    .map(<[String]>::to_vec)
                    .unwrap_or_else(|| vec![value.marshal()]);
                Ok(())
            })
            .getter::<Wiring>("getOnCommand", |w| Value::Text(w.on_command.clone()))
            .setter::<Wiring>("setOnCommand", |w, value| {
                w.on_command = value.marshal();
                Ok(())
            });
        table
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Wrap an item and register it under a name, closing the construction
/// window.
pub fn registered(item: Box<dyn HomeItem>, id: u64, name: &str) -> ItemInstance {
    let mut instance = ItemInstance::new(item);
    instance.register(id, name);
    instance
}
