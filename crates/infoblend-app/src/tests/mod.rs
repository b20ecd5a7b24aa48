mod agent_tests;
