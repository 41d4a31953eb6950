use std::sync::Arc;

use rumqttc::v5::{
    AsyncClient, EventLoop, MqttOptions,
    mqttbytes::{
        QoS,
        v5::{ConnectProperties, Packet, Publish, SubscribeProperties},
    },
};

use rumqttc::v5::Event::Incoming;
use tokio::sync::mpsc;

use super::*;

pub struct Mqtt {
    client: Arc<AsyncClient>,
    event_loop: EventLoop,
    subscriptions: Vec<MqttSubscriptionHandle>,
}

struct MqttSubscriptionHandle {
    topic: String,
    txs: Vec<mpsc::Sender<MqttInMessage>>,
}

impl Mqtt {
    pub fn connect(host: &str, port: u16, client_id: &str, credentials: Option<(&str, &str)>) -> Self {
        let mut mqttoptions = MqttOptions::new(client_id, host, port);
        mqttoptions.set_keep_alive(::std::time::Duration::from_secs(5));
        mqttoptions.set_clean_start(false);

        if let Some((username, password)) = credentials {
            mqttoptions.set_credentials(username, password);
        }

        let mut connect_props = ConnectProperties::new();
        connect_props.session_expiry_interval = 60.into();
        connect_props.max_packet_size = Some(1024 * 1024);
        mqttoptions.set_connect_properties(connect_props);

        let (client, event_loop) = AsyncClient::new(mqttoptions, 10);

        Mqtt {
            client: Arc::new(client),
            event_loop,
            subscriptions: vec![],
        }
    }

    //Only registers the topic, the broker subscription is sent once the event loop runs
    pub fn subscribe(&mut self, topic: impl Into<String>) -> MqttSubscription {
        self.subscribe_all(&[topic.into()])
    }

    pub fn subscribe_all(&mut self, topics: &[String]) -> MqttSubscription {
        let (tx, rx) = mpsc::channel::<MqttInMessage>(32);

        for topic in topics {
            if let Some(subscription) = self.subscriptions.iter_mut().find(|s| s.topic == *topic) {
                tracing::info!("Adding subscriber to already existing subscription: {:?}", &topic);

                subscription.txs.push(tx.clone());
                continue;
            };

            tracing::info!("Creating new subscription for topic: {:?}", &topic);

            self.subscriptions.push(MqttSubscriptionHandle {
                topic: topic.clone(),
                txs: vec![tx.clone()],
            });
        }

        MqttSubscription::new(rx)
    }

    pub fn sender(&self) -> MqttSender {
        MqttSender::new(self.client.clone())
    }

    pub async fn run(mut self) {
        //The request queue is bounded, so subscriptions are sent while the loop is already draining it
        tokio::spawn(send_subscriptions(self.client.clone(), self.subscription_requests()));

        //Receive and forward MQTT messages
        loop {
            match self.event_loop.poll().await {
                Ok(Incoming(Packet::Publish(publish))) => {
                    self.handle_publish(publish).await;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("MQTT error: {}", e);
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    }

    //Subscription identifiers are 1-based positions in the subscription list
    fn subscription_requests(&self) -> Vec<(String, usize)> {
        self.subscriptions
            .iter()
            .enumerate()
            .map(|(index, s)| (s.topic.clone(), index + 1))
            .collect()
    }

    async fn handle_publish(&self, msg: Publish) {
        let mqtt_in_message: MqttInMessage = match (&msg).try_into() {
            Ok(m) => m,
            Err(e) => {
                tracing::error!("Error parsing MQTT message: {}", e);
                return;
            }
        };

        tracing::trace!("Received MQTT message on topic {}", mqtt_in_message.topic);

        let subscription_ids = match msg.properties {
            Some(p) => p.subscription_identifiers,
            None => {
                tracing::error!("No subscription identifiers in MQTT message");
                return;
            }
        };

        for id in subscription_ids {
            match id.checked_sub(1).and_then(|index| self.subscriptions.get(index)) {
                Some(sub) => {
                    for tx in sub.txs.iter() {
                        tracing::trace!(
                            "Forwarding MQTT message to subscriber {} (closed={}): {:?}",
                            sub.topic,
                            tx.is_closed(),
                            mqtt_in_message
                        );
                        if let Err(e) = tx
                            .send_timeout(mqtt_in_message.clone(), tokio::time::Duration::from_secs(5))
                            .await
                        {
                            tracing::error!("Failed to forward MQTT message to subscriber {}: {}", sub.topic, e);
                        }
                    }
                }
                None => {
                    tracing::error!("No subscription for id: {}", id);
                }
            }
        }
    }
}

async fn send_subscriptions(client: Arc<AsyncClient>, requests: Vec<(String, usize)>) {
    for (topic, id) in requests {
        let properties = SubscribeProperties {
            id: Some(id),
            user_properties: vec![],
        };

        match client.subscribe_with_properties(topic.clone(), QoS::AtLeastOnce, properties).await {
            Ok(()) => tracing::debug!("Subscription for {} requested", topic),
            Err(e) => tracing::error!("Error subscribing to {}: {}", topic, e),
        }
    }
}
